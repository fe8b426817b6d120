use ayala_printer::{FilePrinter, HtmlTicketBuilder, PrintError, Printer};

fn sample() -> ayala_printer::HtmlDocument {
    let mut b = HtmlTicketBuilder::new("Bill");
    b.header("איילה פשוט טעים");
    b.line_item("סלט יווני", "₪69");
    b.total("סה\"כ לתשלום:", "₪69");
    b.build("bill_4")
}

#[tokio::test]
async fn test_spools_document_to_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let printer = FilePrinter::new(dir.path().join("prints"));
    let doc = sample();

    assert!(printer.is_online().await);
    printer.print(&doc).await.unwrap();

    let written = std::fs::read_to_string(printer.path_for(&doc)).unwrap();
    assert_eq!(written, doc.html);
    assert!(written.contains("&quot;"));
}

#[tokio::test]
async fn test_reprint_replaces_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let printer = FilePrinter::new(dir.path());
    let doc = sample();

    printer.print(&doc).await.unwrap();
    printer.print(&doc).await.unwrap();

    let files = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(files, 1);
}

#[tokio::test]
async fn test_unavailable_surface_is_blocked() {
    let dir = tempfile::TempDir::new().unwrap();
    // A regular file where the spool directory should be
    let blocker = dir.path().join("prints");
    std::fs::write(&blocker, "not a directory").unwrap();

    let printer = FilePrinter::new(&blocker);
    let err = printer.print(&sample()).await.unwrap_err();

    assert!(matches!(err, PrintError::Blocked(_)));
    assert!(err.is_retryable());
    assert!(!printer.is_online().await);
}
