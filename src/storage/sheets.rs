use async_trait::async_trait;
use http::header::AUTHORIZATION;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rquest::RequestBuilder;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error};
use crate::clients::HttpClient;
use crate::clients::http::json_body;
use crate::error::{Error, Result};
use crate::storage::google_auth::{fetch_access_token, ServiceAccountKey};
use crate::storage::{DocumentHandle, SheetRef, SpreadsheetBackend};

const SPREADSHEET_MIME_TYPE: &str = "application/vnd.google-apps.spreadsheet";

// Everything but RFC 3986 unreserved characters.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Google Sheets backend; documents are looked up by name through Drive.
pub struct GoogleSheetsClient {
    client: HttpClient,
    sheets_api_url: String,
    drive_api_url: String,
}

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Spreadsheet {
    spreadsheet_id: String,
    #[serde(default)]
    sheets: Vec<Sheet>,
}

#[derive(Debug, Deserialize)]
struct Sheet {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    #[serde(default)]
    sheet_id: i64,
    title: String,
    #[serde(default)]
    index: i64,
}

impl From<SheetProperties> for SheetRef {
    fn from(properties: SheetProperties) -> Self {
        SheetRef {
            id: properties.sheet_id,
            title: properties.title,
        }
    }
}

impl GoogleSheetsClient {
    /// Exchanges the service-account key for an access token used by every later call.
    pub async fn connect(key: &ServiceAccountKey, sheets_api_url: &str, drive_api_url: &str) -> Result<Self> {
        let token = fetch_access_token(&HttpClient::new()?, key).await?;
        let client = HttpClient::new()?.with_secret_header(AUTHORIZATION, &format!("Bearer {}", token))?;

        debug!(client_email = %key.client_email, "Connected to Google Sheets");

        Ok(Self {
            client,
            sheets_api_url: sheets_api_url.trim_end_matches('/').to_string(),
            drive_api_url: drive_api_url.trim_end_matches('/').to_string(),
        })
    }

    fn spreadsheet_url(&self, spreadsheet_id: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}",
            self.sheets_api_url,
            utf8_percent_encode(spreadsheet_id, PATH_SEGMENT)
        )
    }

    fn values_url(&self, spreadsheet_id: &str, range: &str) -> String {
        format!(
            "{}/values/{}",
            self.spreadsheet_url(spreadsheet_id),
            utf8_percent_encode(range, PATH_SEGMENT)
        )
    }

    async fn call(&self, operation: &str, request: RequestBuilder) -> Result<Value> {
        let response = self
            .client
            .send(request)
            .await
            .map_err(|e| Error::backend(operation, e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::backend(operation, e))?;

        if !status.is_success() {
            let body_str = String::from_utf8_lossy(&body);
            error!(
                operation = operation,
                status = status.as_u16(),
                body = %body_str,
                "Spreadsheet request failed"
            );
            return Err(Error::Backend(format!("{} failed: {}, {}", operation, status, body_str)));
        }

        if body.is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&body).map_err(|e| Error::backend(operation, e))
    }
}

fn parse<T: serde::de::DeserializeOwned>(operation: &str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| Error::backend(operation, e))
}

/// Drive search expression matching a non-trashed spreadsheet with exactly this name.
pub fn name_query(name: &str) -> String {
    let escaped = name.replace('\\', "\\\\").replace('\'', "\\'");
    format!(
        "name = '{}' and mimeType = '{}' and trashed = false",
        escaped, SPREADSHEET_MIME_TYPE
    )
}

/// A1 reference to a whole sheet, e.g. `'Sheet1'`.
pub fn quote_sheet_title(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

#[async_trait]
impl SpreadsheetBackend for GoogleSheetsClient {
    async fn find_document(&self, name: &str) -> Result<Option<DocumentHandle>> {
        let url = format!("{}/drive/v3/files", self.drive_api_url);
        let query = name_query(name);
        let request = self.client.get(&url).query(&[
            ("q", query.as_str()),
            ("fields", "files(id,name)"),
            ("supportsAllDrives", "true"),
            ("includeItemsFromAllDrives", "true"),
        ]);

        let list: FileList = parse("find spreadsheet", self.call("find spreadsheet", request).await?)?;

        Ok(list
            .files
            .into_iter()
            .find(|file| file.name == name)
            .map(|file| DocumentHandle { id: file.id, name: file.name }))
    }

    async fn create_document(&self, name: &str) -> Result<DocumentHandle> {
        let url = format!("{}/v4/spreadsheets", self.sheets_api_url);
        let request = json_body(self.client.post(&url), &json!({ "properties": { "title": name } }))?;

        let created: Spreadsheet = parse("create spreadsheet", self.call("create spreadsheet", request).await?)?;

        Ok(DocumentHandle {
            id: created.spreadsheet_id,
            name: name.to_string(),
        })
    }

    async fn first_sheet(&self, document: &DocumentHandle) -> Result<Option<SheetRef>> {
        let request = self
            .client
            .get(&self.spreadsheet_url(&document.id))
            .query(&[("fields", "spreadsheetId,sheets.properties")]);

        let spreadsheet: Spreadsheet = parse("get spreadsheet", self.call("get spreadsheet", request).await?)?;

        Ok(spreadsheet
            .sheets
            .into_iter()
            .map(|sheet| sheet.properties)
            .min_by_key(|properties| properties.index)
            .map(SheetRef::from))
    }

    async fn add_sheet(
        &self,
        document: &DocumentHandle,
        title: &str,
        rows: u32,
        columns: u32,
    ) -> Result<SheetRef> {
        let url = format!("{}:batchUpdate", self.spreadsheet_url(&document.id));
        let body = json!({
            "requests": [{
                "addSheet": {
                    "properties": {
                        "title": title,
                        "gridProperties": { "rowCount": rows, "columnCount": columns }
                    }
                }
            }]
        });
        let request = json_body(self.client.post(&url), &body)?;

        let reply = self.call("add sheet", request).await?;
        let properties = reply
            .pointer("/replies/0/addSheet/properties")
            .cloned()
            .ok_or_else(|| Error::Backend("add sheet: reply missing sheet properties".to_string()))?;
        let properties: SheetProperties = parse("add sheet", properties)?;

        Ok(SheetRef::from(properties))
    }

    async fn clear_sheet(&self, document: &DocumentHandle, sheet: &SheetRef) -> Result<()> {
        let url = format!("{}:clear", self.values_url(&document.id, &quote_sheet_title(&sheet.title)));
        let request = json_body(self.client.post(&url), &json!({}))?;

        self.call("clear sheet", request).await?;
        Ok(())
    }

    async fn write_rows(
        &self,
        document: &DocumentHandle,
        sheet: &SheetRef,
        rows: Vec<Vec<Value>>,
    ) -> Result<()> {
        let range = format!("{}!A1", quote_sheet_title(&sheet.title));
        let url = self.values_url(&document.id, &range);
        let body = json!({
            "range": range,
            "majorDimension": "ROWS",
            "values": rows,
        });
        let request = json_body(
            self.client.put(&url).query(&[("valueInputOption", "RAW")]),
            &body,
        )?;

        self.call("update values", request).await?;
        Ok(())
    }
}
