use std::fs;
use tempfile::TempDir;

use tramita_ingest::{load_documents, normalize_whitespace};

#[test]
fn whitespace_runs_collapse_to_single_spaces() {
    let raw = "  El plazo\n\nde   presentación\tes de\n15 días.  ";
    assert_eq!(
        normalize_whitespace(raw),
        "El plazo de presentación es de 15 días."
    );
}

#[test]
fn empty_text_normalizes_to_empty() {
    assert_eq!(normalize_whitespace("   \n\t  "), "");
}

#[test]
fn loads_text_files_in_sorted_order_with_stems_as_ids() {
    let tmp = TempDir::new().expect("tempdir");
    fs::write(tmp.path().join("b_guia.txt"), "Texto de la guía.").expect("write");
    fs::write(tmp.path().join("a_ayudas.md"), "Texto  de\nlas ayudas.").expect("write");

    let docs = load_documents(tmp.path()).expect("load");
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].source, "a_ayudas");
    assert_eq!(docs[0].text, "Texto de las ayudas.");
    assert_eq!(docs[1].source, "b_guia");
    assert_eq!(docs[1].text, "Texto de la guía.");
}

#[test]
fn unsupported_extensions_are_ignored() {
    let tmp = TempDir::new().expect("tempdir");
    fs::write(tmp.path().join("notas.txt"), "contenido").expect("write");
    fs::write(tmp.path().join("registro.log"), "ignorar").expect("write");
    fs::write(tmp.path().join("datos.csv"), "a,b,c").expect("write");

    let docs = load_documents(tmp.path()).expect("load");
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].source, "notas");
}

#[test]
fn malformed_pdf_fails_in_isolation() {
    let tmp = TempDir::new().expect("tempdir");
    fs::write(tmp.path().join("roto.pdf"), b"this is not a pdf").expect("write");
    fs::write(tmp.path().join("sano.txt"), "Documento legible.").expect("write");

    // The broken document must not abort the batch; it just comes back
    // empty so the build phase can skip and report it.
    let docs = load_documents(tmp.path()).expect("load must not fail");
    assert_eq!(docs.len(), 2);
    let broken = docs.iter().find(|d| d.source == "roto").expect("present");
    assert!(broken.text.is_empty());
    let healthy = docs.iter().find(|d| d.source == "sano").expect("present");
    assert_eq!(healthy.text, "Documento legible.");
}

#[test]
fn empty_directory_is_not_an_error() {
    let tmp = TempDir::new().expect("tempdir");
    let docs = load_documents(tmp.path()).expect("load");
    assert!(docs.is_empty());
}
