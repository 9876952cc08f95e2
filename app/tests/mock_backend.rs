//! Commands run against the mock server seeded with its demo inventory.

use std::sync::Arc;

use clap::Parser;
use tool_tracker::{App, Cli, Format, UreqTransport};
use tool_tracker_core::TrackerClient;

fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener, mock_server::Store::with_demo_data()).await
        })
        .unwrap();
    });

    format!("http://{addr}/api")
}

async fn run(base_url: &str, args: &[&str]) -> String {
    let cli = Cli::try_parse_from(std::iter::once("tool-tracker").chain(args.iter().copied())).unwrap();
    let app = App::new(
        TrackerClient::new(base_url),
        Arc::new(UreqTransport::new()),
        cli.format,
    );
    app.run(cli.command).await.unwrap()
}

#[tokio::test]
async fn demo_inventory_lists_and_filters() {
    let base_url = start_server();

    let output = run(&base_url, &["tools"]).await;
    assert!(output.starts_with("Tool Inventory\n"), "{output}");
    assert!(output.contains("Step Ladder [Maintenance]"), "{output}");
    assert!(output.contains("Circular Saw [Checked Out]"), "{output}");
    assert!(output.contains("Cordless Drill [In Office]"), "{output}");

    let output = run(&base_url, &["tools", "--status", "LOST"]).await;
    assert_eq!(output, "Tool Inventory\n\nNo tools found. Try adding some tools first.\n");

    let output = run(&base_url, &["users", "--role", "MANAGER", "--format", "html"]).await;
    assert!(output.contains("Grace Hopper"), "{output}");
    assert!(output.contains("bg-indigo-100 text-indigo-800"), "{output}");
    assert!(!output.contains("Ada Lovelace"), "{output}");

    let output = run(&base_url, &["stats"]).await;
    assert!(output.starts_with("Tools: 3 (in office 1, checked out 1, maintenance 1, lost 0)"));
}

#[tokio::test]
async fn unreachable_backend_shows_banner() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let output = run(&format!("http://{addr}/api"), &["events"]).await;
    assert!(output.starts_with("Error: request failed:"), "{output}");
    assert_eq!(Format::default(), Format::Text);
}
