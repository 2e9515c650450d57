//! DynamoDB-backed metadata store.
//!
//! Items have two attributes: `ipfs_hash` (S, partition key) and `metadata`
//! (M, the document). Single-record reads are `GetItem` point reads; listing
//! is an unfiltered `Scan` that follows `LastEvaluatedKey` until the table is
//! exhausted.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::config::Region;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;

use super::attribute::{from_attribute_map, to_attribute_map};
use super::{DOCUMENT_ATTR, Document, IDENTIFIER_ATTR, MetadataRecord, MetadataStore};
use crate::config::AppConfig;
use crate::error::StoreError;

/// Projection of the two record attributes, through placeholder names.
const PROJECTION: &str = "#id, #doc";

/// DynamoDB metadata table.
#[derive(Debug, Clone)]
pub struct DynamoStore {
    client: Client,
    table_name: String,
}

impl DynamoStore {
    /// Wrap an existing client.
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self { client, table_name: table_name.into() }
    }

    /// Build a client for `config.aws_region`, honoring `dynamodb_endpoint`.
    ///
    /// Credentials come from the standard AWS provider chain.
    pub async fn from_config(config: &AppConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.aws_region.clone()));
        if let Some(endpoint) = &config.dynamodb_endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        tracing::debug!(
            region = %config.aws_region,
            endpoint = config.dynamodb_endpoint.as_deref().unwrap_or("default"),
            "built DynamoDB client"
        );

        Self::new(Client::new(&sdk_config), config.table_name.clone())
    }

    /// Table this store reads and writes.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

fn transport_fault<E>(operation: &str, err: E) -> StoreError
where
    E: std::error::Error,
{
    StoreError::TransportFault(format!("{operation}: {}", DisplayErrorContext(err)))
}

fn projection_names() -> HashMap<String, String> {
    HashMap::from([
        ("#id".to_string(), IDENTIFIER_ATTR.to_string()),
        ("#doc".to_string(), DOCUMENT_ATTR.to_string()),
    ])
}

/// Encode a record as a DynamoDB item.
pub fn record_to_item(record: &MetadataRecord) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (IDENTIFIER_ATTR.to_string(), AttributeValue::S(record.ipfs_hash.clone())),
        (DOCUMENT_ATTR.to_string(), AttributeValue::M(to_attribute_map(&record.metadata))),
    ])
}

/// Decode the document attribute of a DynamoDB item.
pub fn item_to_document(item: &HashMap<String, AttributeValue>) -> Result<Document, StoreError> {
    let identifier = match item.get(IDENTIFIER_ATTR) {
        Some(AttributeValue::S(s)) => s.as_str(),
        _ => return Err(StoreError::MalformedRecord(format!("missing or invalid {IDENTIFIER_ATTR} attribute"))),
    };

    match item.get(DOCUMENT_ATTR) {
        Some(AttributeValue::M(map)) => from_attribute_map(map),
        Some(AttributeValue::Null(_)) | None => Ok(Document::new()),
        Some(_) => Err(StoreError::MalformedRecord(format!("{identifier}: {DOCUMENT_ATTR} is not a map"))),
    }
}

#[async_trait]
impl MetadataStore for DynamoStore {
    async fn put(&self, identifier: &str, document: Document) -> Result<(), StoreError> {
        let record = MetadataRecord::new(identifier, document)?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(record_to_item(&record)))
            .send()
            .await
            .map_err(|e| transport_fault("PutItem", e))?;

        Ok(())
    }

    async fn get_one(&self, identifier: &str) -> Result<Document, StoreError> {
        if identifier.is_empty() {
            return Err(StoreError::NotFound(String::new()));
        }

        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(IDENTIFIER_ATTR, AttributeValue::S(identifier.to_string()))
            .projection_expression(PROJECTION)
            .set_expression_attribute_names(Some(projection_names()))
            .send()
            .await
            .map_err(|e| transport_fault("GetItem", e))?;

        match output.item() {
            Some(item) => item_to_document(item),
            None => Err(StoreError::NotFound(identifier.to_string())),
        }
    }

    async fn get_all(&self) -> Result<Vec<Document>, StoreError> {
        let mut documents = Vec::new();
        let mut start_key: Option<HashMap<String, AttributeValue>> = None;
        let mut pages = 0usize;

        loop {
            let output = self
                .client
                .scan()
                .table_name(&self.table_name)
                .projection_expression(PROJECTION)
                .set_expression_attribute_names(Some(projection_names()))
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| transport_fault("Scan", e))?;
            pages += 1;

            for item in output.items() {
                documents.push(item_to_document(item)?);
            }

            match output.last_evaluated_key() {
                Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                _ => break,
            }
        }

        tracing::debug!(table = %self.table_name, pages, count = documents.len(), "scanned metadata table");

        Ok(documents)
    }

    fn backend(&self) -> &'static str {
        "dynamodb"
    }
}
