use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

const PORT: u16 = 19_431;

async fn scrape(port: u16) -> String {
    for _ in 0..50 {
        if let Ok(mut stream) = TcpStream::connect(("127.0.0.1", port)).await {
            stream
                .write_all(b"GET /metrics HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
                .await
                .unwrap();
            let mut response = String::new();
            stream.read_to_string(&mut response).await.unwrap();
            return response;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("exporter never accepted a connection on port {port}");
}

#[tokio::test]
async fn exporter_serves_recorded_counters_over_http() {
    let handle = ss_metrics::init_metrics("SS_METRICS_EXPORTER_TEST_PORT", PORT)
        .expect("exporter should start inside a runtime");

    ss_metrics::record_prediction("best_worker");
    ss_metrics::record_worker_failure("batch_suitability", 2);

    assert!(handle
        .render()
        .contains("ss_predictions_total{endpoint=\"best_worker\"} 1"));

    let response = scrape(PORT).await;
    assert!(response.starts_with("HTTP/1.1 200"), "got {response}");
    assert!(response.contains("ss_worker_scoring_failures_total{endpoint=\"batch_suitability\"} 2"));

    let again = ss_metrics::init_metrics("SS_METRICS_EXPORTER_TEST_PORT", PORT).unwrap();
    assert!(std::ptr::eq(handle, again));
}
