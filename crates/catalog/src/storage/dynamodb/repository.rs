//! DynamoDB item store.
//!
//! Implements `catalog_core::storage::ItemStore` on top of `aws-sdk-dynamodb`.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::ReturnValuesOnConditionCheckFailure;
use aws_sdk_dynamodb::Client;

use catalog_core::item::{AttributeValue, Item};
use catalog_core::storage::{ItemStore, Key, Page, PutCondition, Query, Result};

use super::conversions::{
    condition_expression, filter_expression, from_sdk_item, key_condition, key_to_sdk,
    to_sdk_item, to_sdk_value,
};
use super::error::{
    map_delete_item_error, map_describe_table_error, map_get_item_error, map_put_item_error,
    map_query_error, map_update_item_error,
};

/// DynamoDB-backed item store.
#[derive(Debug, Clone)]
pub struct DynamoDbStore {
    client: Client,
}

impl DynamoDbStore {
    /// Creates a store with the given DynamoDB client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Creates a store from the AWS default credential chain.
    ///
    /// `endpoint_url` points the client at a local DynamoDB when set.
    pub async fn connect(region: &str, endpoint_url: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_string()));

        if let Some(endpoint) = endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        let config = loader.load().await;
        Self::new(Client::new(&config))
    }
}

#[async_trait]
impl ItemStore for DynamoDbStore {
    async fn get_item(&self, table: &str, key: &Key) -> Result<Option<Item>> {
        let result = self
            .client
            .get_item()
            .table_name(table)
            .set_key(Some(key_to_sdk(key)))
            .consistent_read(true)
            .send()
            .await
            .map_err(map_get_item_error)?;

        result.item.map(from_sdk_item).transpose()
    }

    async fn put_item(
        &self,
        table: &str,
        key: &Key,
        item: Item,
        condition: PutCondition,
    ) -> Result<()> {
        let mut request = self
            .client
            .put_item()
            .table_name(table)
            .set_item(Some(to_sdk_item(item)));

        if let Some(expr) = condition_expression(key, condition) {
            request = request
                .condition_expression(expr.expression)
                .set_expression_attribute_names(Some(expr.names))
                .return_values_on_condition_check_failure(
                    ReturnValuesOnConditionCheckFailure::AllOld,
                );
            if !expr.values.is_empty() {
                request = request.set_expression_attribute_values(Some(expr.values));
            }
        }

        request
            .send()
            .await
            .map_err(|e| map_put_item_error(e, key, condition))?;

        Ok(())
    }

    async fn set_attribute(
        &self,
        table: &str,
        key: &Key,
        attribute: &str,
        value: AttributeValue,
    ) -> Result<()> {
        self.client
            .update_item()
            .table_name(table)
            .set_key(Some(key_to_sdk(key)))
            .update_expression("SET #attr = :value")
            .condition_expression("attribute_exists(#pk)")
            .expression_attribute_names("#attr", attribute)
            .expression_attribute_names("#pk", key.attribute)
            .expression_attribute_values(":value", to_sdk_value(value))
            .send()
            .await
            .map_err(|e| map_update_item_error(e, key))?;

        Ok(())
    }

    async fn delete_item(&self, table: &str, key: &Key) -> Result<()> {
        self.client
            .delete_item()
            .table_name(table)
            .set_key(Some(key_to_sdk(key)))
            .condition_expression("attribute_exists(#pk)")
            .expression_attribute_names("#pk", key.attribute)
            .send()
            .await
            .map_err(|e| map_delete_item_error(e, key))?;

        Ok(())
    }

    async fn query_page(&self, query: &Query, exclusive_start_key: Option<Item>) -> Result<Page> {
        let mut expr = key_condition(&query.partition_attribute, &query.partition_value);

        let mut request = self
            .client
            .query()
            .table_name(&query.table)
            .set_index_name(query.index.clone())
            .key_condition_expression(expr.expression.clone())
            .set_exclusive_start_key(exclusive_start_key.map(to_sdk_item));

        if let Some(filter) = &query.filter {
            let filter = filter_expression(filter);
            request = request.filter_expression(filter.expression);
            expr.names.extend(filter.names);
            expr.values.extend(filter.values);
        }

        let result = request
            .set_expression_attribute_names(Some(expr.names))
            .set_expression_attribute_values(Some(expr.values))
            .send()
            .await
            .map_err(map_query_error)?;

        // Items the catalog model cannot represent are dropped here, like
        // items that later fail to decode.
        let items = result
            .items
            .unwrap_or_default()
            .into_iter()
            .filter_map(|item| match from_sdk_item(item) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!(table = %query.table, error = %e, "Skipping unreadable item");
                    None
                }
            })
            .collect();

        let last_evaluated_key = result.last_evaluated_key.map(from_sdk_item).transpose()?;

        Ok(Page {
            items,
            last_evaluated_key,
        })
    }

    async fn check_table(&self, table: &str) -> Result<()> {
        self.client
            .describe_table()
            .table_name(table)
            .send()
            .await
            .map_err(|e| map_describe_table_error(e, table))?;

        Ok(())
    }
}
