use std::fs::File;
use std::io::BufWriter;
use tracing_subscriber::EnvFilter;
use window_letter::{render_letter, LayoutEngine, LetterDocument, PdfSink};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let input = args
        .next()
        .unwrap_or_else(|| concat!(env!("CARGO_MANIFEST_DIR"), "/demos/letter.json").to_string());
    let output = args.next().unwrap_or_else(|| "letter.pdf".to_string());

    let file = File::open(&input).expect("can open letter description");
    let document = LetterDocument::from_reader(file).expect("letter description is valid");

    let letter = LayoutEngine::default()
        .layout(&document)
        .expect("letter can be laid out");
    for warning in letter.warnings.iter() {
        eprintln!("warning: {warning}");
    }

    let mut sink = PdfSink::for_letter(&document);
    render_letter(&letter, &mut sink).expect("can render pages");

    let out = File::create(&output).expect("can create output file");
    sink.write(BufWriter::new(out)).expect("can write PDF");
    println!("wrote {} page(s) to {output}", letter.page_count());
}
