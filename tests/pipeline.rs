use anyhow::Result;
use packlist::{fetch::ExtractionClient, fetch::UploadRequest, Outcome, OutputFormat};
use serde_json::{json, Value};
use std::io::Write;
use tempfile::{tempdir, NamedTempFile};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
    sync::oneshot,
};
use url::Url;

/// Serve exactly one HTTP request with `status` and `body`, handing the raw
/// request text back through the returned channel.
async fn serve_once(status: &'static str, body: String) -> Result<(Url, oneshot::Receiver<String>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let url = Url::parse(&format!("http://{}/packinglist/", listener.local_addr()?))?;
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.expect("read");
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if request_complete(&buf) {
                break;
            }
        }
        let reply = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(reply.as_bytes()).await.expect("write");
        socket.shutdown().await.ok();
        let _ = tx.send(String::from_utf8_lossy(&buf).to_string());
    });

    Ok((url, rx))
}

fn request_complete(buf: &[u8]) -> bool {
    let text = String::from_utf8_lossy(buf);
    let Some(head_end) = text.find("\r\n\r\n") else {
        return false;
    };
    let length = text[..head_end]
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.trim()
                .eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);
    buf.len() >= head_end + 4 + length
}

fn upload_file() -> Result<NamedTempFile> {
    let mut file = NamedTempFile::with_suffix(".txt")?;
    write!(file, "PACKING LIST\nBox x2\n")?;
    Ok(file)
}

#[tokio::test]
async fn submit_renders_table_and_exports_csv() -> Result<()> {
    let response = json!({
        "message": { "result": [{ "result": { "output": { "Packing List_1": [
            { "item_name": "Box", "quantity": 2, "remarks": "keep dry, upright" },
            { "package_no": "P-2", "item_name": "Crate", "gross_weight": 12.5 }
        ] } } }] }
    });
    let (url, request_rx) = serve_once("200 OK", response.to_string()).await?;
    let file = upload_file()?;

    let client = ExtractionClient::new(url, Some("secret-key".to_string()));
    let mut request = UploadRequest::new(file.path());
    request.timeout_secs = 120;
    request.include_metadata = true;

    let outcome = Outcome::settle(client.submit(&request).await);
    let list = outcome.packing_list().expect("packing list located");
    assert_eq!(
        list.schema().keys(),
        ["package_no", "item_name", "quantity", "gross_weight", "remarks"]
    );

    let csv = outcome.render(OutputFormat::Csv)?;
    assert_eq!(
        csv,
        "Package No,Item Name,Quantity,Gross Weight,Remarks\n\
         ,Box,2,,\"keep dry, upright\"\n\
         P-2,Crate,,12.5,\n"
    );

    let dir = tempdir()?;
    let path = list.csv_document("packing_list").write_to(dir.path())?;
    assert_eq!(std::fs::read_to_string(path)?, csv);

    let raw = request_rx.await?;
    assert!(raw.starts_with("POST /packinglist/ HTTP/1.1"));
    assert!(raw.to_ascii_lowercase().contains("authorization: bearer secret-key"));
    assert!(raw.contains(r#"name="files"; filename="file""#));
    assert!(raw.contains("PACKING LIST\nBox x2\n"));
    assert!(raw.contains("name=\"timeout\"\r\n\r\n120\r\n"));
    assert!(raw.contains("name=\"include_metadata\"\r\n\r\ntrue\r\n"));
    Ok(())
}

#[tokio::test]
async fn unrecognised_reply_falls_back_to_raw_json() -> Result<()> {
    let (url, _rx) = serve_once("200 OK", r#"{"status":"queued"}"#.to_string()).await?;
    let file = upload_file()?;
    let client = ExtractionClient::new(url, None);

    let outcome = Outcome::settle(client.submit(&UploadRequest::new(file.path())).await);
    assert_eq!(outcome, Outcome::Raw("{\n  \"status\": \"queued\"\n}".to_string()));
    Ok(())
}

#[tokio::test]
async fn non_success_status_is_a_transport_error() -> Result<()> {
    let (url, _rx) = serve_once("502 Bad Gateway", "{}".to_string()).await?;
    let file = upload_file()?;
    let client = ExtractionClient::new(url, None);

    let outcome = Outcome::settle(client.submit(&UploadRequest::new(file.path())).await);
    assert_eq!(outcome, Outcome::Error("Error: HTTP error! Status: 502".to_string()));
    Ok(())
}

#[test]
fn located_records_round_trip_through_csv() -> Result<()> {
    let response = json!({ "result": { "output": { "Packing List_1": [
        { "material": "steel", "item_name": "Bolt", "dimension": "10mm", "zone": "A" },
        { "volume": "0.2", "item_name": "Nut", "batch": "B7" }
    ] } } });
    let outcome = Outcome::from_response(&response);
    let list = outcome.packing_list().expect("packing list located");
    let csv = list.to_csv();

    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), list.records().len() + 1);
    assert_eq!(lines[0], "Item Name,Material,Dimension,Volume,Batch,Zone");
    for (line, row) in lines[1..].iter().zip(list.rows()) {
        let expected: Vec<String> = row.iter().map(packlist::project::cell_text).collect();
        assert_eq!(line.split(',').collect::<Vec<_>>(), expected);
    }

    let table: Value = serde_json::from_str(&outcome.render(OutputFormat::Json)?)?;
    assert_eq!(table["rows"][1], json!(["Nut", "", "", "0.2", "B7", ""]));
    Ok(())
}
