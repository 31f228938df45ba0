use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use xmpdict::{parse_date, xmp_to_map, ParseOptions, PdfDate, XmpParser};

// Single Description with attribute properties
const SIMPLE_XMP: &str = r#"<?xpacket begin="" id="W5M0MpCehiHzreSzNTczkc9d"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:xmp="http://ns.adobe.com/xap/1.0/">
  <rdf:Description rdf:about=""
                   xmp:CreatorTool="Adobe Photoshop CS2 Windows"/>
</rdf:RDF>
<?xpacket end="w"?>"#;

// Packet as written by PDF producers, one Description per schema
const PDF_XMP: &str = r#"<?xpacket begin="" id="W5M0MpCehiHzreSzNTczkc9d"?>
<x:xmpmeta xmlns:x="adobe:ns:meta/">
  <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
    <rdf:Description rdf:about="" xmlns:pdf="http://ns.adobe.com/pdf/1.3/">
      <pdf:Producer>LibreOffice 5.1</pdf:Producer>
      <pdf:Keywords>fairy, circles, namibia</pdf:Keywords>
    </rdf:Description>
    <rdf:Description rdf:about="" xmlns:xmp="http://ns.adobe.com/xap/1.0/">
      <xmp:CreatorTool>Writer</xmp:CreatorTool>
      <xmp:CreateDate>2016-03-09T10:12:42+01:00</xmp:CreateDate>
      <xmp:ModifyDate>2016-03-10T08:00:00+01:00</xmp:ModifyDate>
    </rdf:Description>
    <rdf:Description rdf:about="" xmlns:xmpMM="http://ns.adobe.com/xap/1.0/mm/"
                     xmpMM:DocumentID="uuid:FE607D9B5FD4DA118B7787757E22306B"
                     xmpMM:InstanceID="uuid:BF664E7B33D5DA119129F691B53239AD"/>
    <rdf:Description rdf:about="" xmlns:dc="http://purl.org/dc/elements/1.1/">
      <dc:format>application/pdf</dc:format>
      <dc:title>
        <rdf:Alt>
          <rdf:li xml:lang="x-default">Fairy Circles</rdf:li>
        </rdf:Alt>
      </dc:title>
      <dc:creator>
        <rdf:Seq>
          <rdf:li>Llywelyn</rdf:li>
          <rdf:li>Stefan</rdf:li>
        </rdf:Seq>
      </dc:creator>
    </rdf:Description>
  </rdf:RDF>
</x:xmpmeta>
<?xpacket end="w"?>"#;

fn bench_parse_simple(c: &mut Criterion) {
    c.bench_function("parse_simple", |b| {
        b.iter(|| {
            let _map = xmp_to_map(black_box(SIMPLE_XMP)).unwrap();
        });
    });
}

fn bench_parse_pdf_packet(c: &mut Criterion) {
    c.bench_function("parse_pdf_packet", |b| {
        b.iter(|| {
            let _map = xmp_to_map(black_box(PDF_XMP)).unwrap();
        });
    });
}

fn bench_parse_qualified(c: &mut Criterion) {
    let parser = XmpParser::new(ParseOptions::default().qualified().overwrite());
    c.bench_function("parse_qualified_overwrite", |b| {
        b.iter(|| {
            let _map = parser.parse(black_box(PDF_XMP)).unwrap();
        });
    });
}

fn bench_parse_list_items(c: &mut Criterion) {
    let parser = XmpParser::new(ParseOptions::default().collect_list_items());
    c.bench_function("parse_list_items", |b| {
        b.iter(|| {
            let _map = parser.parse(black_box(PDF_XMP)).unwrap();
        });
    });
}

fn bench_parse_date(c: &mut Criterion) {
    c.bench_function("parse_date", |b| {
        b.iter(|| {
            let _dt = parse_date(black_box("D:20160309101242+01'00'")).unwrap();
        });
    });
    c.bench_function("pdf_date_with_offset", |b| {
        b.iter(|| {
            let _date = PdfDate::parse(black_box("D:20160309101242+01'00'")).unwrap();
        });
    });
}

criterion_group!(
    benches,
    bench_parse_simple,
    bench_parse_pdf_packet,
    bench_parse_qualified,
    bench_parse_list_items,
    bench_parse_date
);
criterion_main!(benches);
