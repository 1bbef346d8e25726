use chrono::NaiveDate;
use pricebot::sheet::google::SheetsAuth;
use pricebot::{
    GoogleSheetsSink, MarkupPolicy, Normalizer, RawRecord, Rounding, SchemaVersion, SheetError,
    SheetSink, SheetWriter,
};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FIRST_ROW: &str = "/v4/spreadsheets/sid/values/'Prices'!1:1";
const HEADER_CELL: &str = "/v4/spreadsheets/sid/values/'Prices'!A1";
const APPEND: &str = "/v4/spreadsheets/sid/values/'Prices':append";
const BATCH: &str = "/v4/spreadsheets/sid:batchUpdate";
const META: &str = "/v4/spreadsheets/sid";

fn sink(server: &MockServer) -> GoogleSheetsSink {
    GoogleSheetsSink::new(&server.uri(), "sid", "Prices", SheetsAuth::Token("tok".into()))
        .unwrap()
}

fn ok_json(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

#[tokio::test]
async fn first_row_reads_values() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(FIRST_ROW))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ok_json(json!({"range": "Prices!A1:G1", "values": [["a", "b"]]})))
        .expect(1)
        .mount(&server)
        .await;

    let row = sink(&server).first_row().await.unwrap();
    assert_eq!(row, vec!["a".to_string(), "b".to_string()]);
}

#[tokio::test]
async fn first_row_of_empty_sheet_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(FIRST_ROW))
        .respond_with(ok_json(json!({"range": "Prices!A1:Z1"})))
        .mount(&server)
        .await;

    assert!(sink(&server).first_row().await.unwrap().is_empty());
}

#[tokio::test]
async fn ensure_headers_inserts_row_when_missing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(FIRST_ROW))
        .respond_with(ok_json(json!({"values": [["BYD", "Han"]]})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(META))
        .respond_with(ok_json(json!({"sheets": [
            {"properties": {"sheetId": 0, "title": "Other"}},
            {"properties": {"sheetId": 42, "title": "Prices"}}
        ]})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(BATCH))
        .respond_with(ok_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(HEADER_CELL))
        .and(query_param("valueInputOption", "RAW"))
        .respond_with(ok_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let writer = SheetWriter::new(sink(&server), SchemaVersion::Legacy);
    assert!(writer.ensure_headers().await.unwrap());

    let requests = server.received_requests().await.unwrap();
    let batch = requests
        .iter()
        .find(|r| r.url.path() == BATCH)
        .unwrap();
    let body: Value = serde_json::from_slice(&batch.body).unwrap();
    let range = &body["requests"][0]["insertDimension"]["range"];
    assert_eq!(range["sheetId"], 42);
    assert_eq!(range["startIndex"], 0);
    assert_eq!(range["endIndex"], 1);

    let put = requests.iter().find(|r| r.url.path() == HEADER_CELL).unwrap();
    let body: Value = serde_json::from_slice(&put.body).unwrap();
    assert_eq!(body["values"][0], json!(SchemaVersion::Legacy.header()));
}

#[tokio::test]
async fn matching_header_is_left_alone() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(FIRST_ROW))
        .respond_with(ok_json(json!({"values": [SchemaVersion::Extended.header()]})))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(BATCH))
        .respond_with(ok_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let writer = SheetWriter::new(sink(&server), SchemaVersion::Extended);
    assert!(!writer.ensure_headers().await.unwrap());
    assert!(!writer.ensure_headers().await.unwrap());
}

#[tokio::test]
async fn unknown_tab_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(META))
        .respond_with(ok_json(json!({"sheets": [
            {"properties": {"sheetId": 1, "title": "Other"}}
        ]})))
        .mount(&server)
        .await;

    let err = sink(&server)
        .insert_first_row(&["a".to_string()])
        .await
        .unwrap_err();
    assert!(matches!(err, SheetError::MissingSheet(name) if name == "Prices"));
}

#[tokio::test]
async fn append_sends_user_entered_rows_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(APPEND))
        .and(query_param("valueInputOption", "USER_ENTERED"))
        .and(query_param("insertDataOption", "INSERT_ROWS"))
        .respond_with(ok_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let normalizer = Normalizer::new(
        SchemaVersion::Legacy,
        MarkupPolicy::new(5.0, Rounding::NearestInteger),
    );
    let day = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
    let records: Vec<RawRecord> = serde_json::from_value(json!([
        {"brand": "BYD", "model": "Yuan UP", "price": "119,800"},
        {"brand": "Geely", "price": "TBD"}
    ]))
    .unwrap();
    let rows = normalizer.normalize_all(&records, day);

    let writer = SheetWriter::new(sink(&server), SchemaVersion::Legacy);
    assert_eq!(writer.append(rows).await.unwrap(), 2);

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(
        body["values"][0],
        json!(["BYD", "Yuan UP", "", "", 119800.0, 125790.0, "01.02.2026"])
    );
    assert_eq!(
        body["values"][1],
        json!(["Geely", "", "", "", "TBD", "", "01.02.2026"])
    );
}

#[tokio::test]
async fn api_error_surfaces_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(FIRST_ROW))
        .respond_with(ResponseTemplate::new(403).set_body_string("denied"))
        .mount(&server)
        .await;

    let err = sink(&server).first_row().await.unwrap_err();
    match err {
        SheetError::Status { status, body } => {
            assert_eq!(status.as_u16(), 403);
            assert_eq!(body, "denied");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
