use catalog_core::catalog::{owner_query, validate_product, Product, ProductPayload};
use catalog_core::item::keys::{product_key, ENTITY_PRODUCT};
use catalog_core::item::{item_to_product, item_version, product_to_item, set_item_version};
use catalog_core::storage::{PutCondition, RepositoryError, Result};
use uuid::Uuid;

use super::CatalogService;

fn require_id(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(RepositoryError::Validation(
            "Product id is required".to_string(),
        ));
    }
    Ok(())
}

impl CatalogService {
    /// Lists every product of an owner, optionally filtered by a
    /// case-insensitive substring of the name.
    ///
    /// Follows continuation keys until the partition is exhausted. A failing
    /// page aborts the whole listing; items that fail to decode are skipped.
    pub async fn query_by_owner(&self, owner_id: &str, name: Option<&str>) -> Result<Vec<Product>> {
        if owner_id.trim().is_empty() {
            return Err(RepositoryError::Validation(
                "Owner id is required".to_string(),
            ));
        }

        let query = owner_query(
            &self.tables.products,
            &self.tables.owner_index,
            owner_id,
            name,
        );

        let mut products = Vec::new();
        let mut start_key = None;
        let mut pages = 0usize;

        loop {
            let page = self.store.query_page(&query, start_key).await?;
            pages += 1;

            for item in &page.items {
                match item_to_product(item) {
                    Ok(product) => products.push(product),
                    Err(e) => tracing::warn!(
                        owner_id = %owner_id,
                        error = %e,
                        "Skipping product that failed to decode"
                    ),
                }
            }

            if page.is_last() {
                break;
            }
            start_key = page.last_evaluated_key;
        }

        tracing::debug!(
            owner_id = %owner_id,
            pages,
            count = products.len(),
            "Queried products by owner"
        );

        Ok(products)
    }

    /// Fetches one product by identifier.
    pub async fn get_product(&self, id: &str) -> Result<Product> {
        self.fetch_product(id).await.map(|(product, _)| product)
    }

    /// Creates an active product under a freshly generated identifier.
    ///
    /// Any identifier in the payload is ignored.
    pub async fn create_product(&self, payload: ProductPayload) -> Result<Product> {
        let product = payload.into_product(Uuid::new_v4().to_string(), true);
        validate_product(&product)?;

        let mut item = product_to_item(&product, true);
        set_item_version(&mut item, 1);

        self.store
            .put_item(
                &self.tables.products,
                &product_key(&product.id),
                item,
                PutCondition::NotExists,
            )
            .await?;

        tracing::info!(
            product_id = %product.id,
            owner_id = %product.owner_id,
            "Product created"
        );

        Ok(product)
    }

    /// Replaces every field of an existing product, keyed by `id`.
    ///
    /// The active flag is taken from the payload, so an update may reactivate
    /// or deactivate the product.
    pub async fn update_product(&self, id: &str, payload: ProductPayload) -> Result<Product> {
        let (_, version) = self.fetch_product(id).await?;

        let is_active = payload.is_active;
        let product = payload.into_product(id, is_active);
        validate_product(&product)?;

        self.write_next_version(&product, version).await?;

        tracing::info!(product_id = %id, is_active, "Product updated");

        Ok(product)
    }

    /// Soft-deletes a product by clearing its active flag.
    pub async fn deactivate_product(&self, id: &str) -> Result<Product> {
        let (mut product, version) = self.fetch_product(id).await?;
        product.is_active = false;

        self.write_next_version(&product, version).await?;

        tracing::info!(product_id = %id, "Product deactivated");

        Ok(product)
    }

    /// Removes a product permanently.
    pub async fn delete_product(&self, id: &str) -> Result<()> {
        require_id(id)?;
        let key = product_key(id);

        if self
            .store
            .get_item(&self.tables.products, &key)
            .await?
            .is_none()
        {
            return Err(RepositoryError::NotFound {
                entity_type: ENTITY_PRODUCT,
                id: id.to_string(),
            });
        }

        self.store.delete_item(&self.tables.products, &key).await?;

        tracing::info!(product_id = %id, "Product deleted");

        Ok(())
    }

    /// Reads and decodes a product together with its stored version.
    async fn fetch_product(&self, id: &str) -> Result<(Product, u64)> {
        require_id(id)?;

        let item = self
            .store
            .get_item(&self.tables.products, &product_key(id))
            .await?
            .ok_or_else(|| RepositoryError::NotFound {
                entity_type: ENTITY_PRODUCT,
                id: id.to_string(),
            })?;

        let product = item_to_product(&item)?;
        let version = item_version(&item)?;
        Ok((product, version))
    }

    /// Writes `product` as `version + 1`, provided the stored version is still `version`.
    async fn write_next_version(&self, product: &Product, version: u64) -> Result<()> {
        let mut item = product_to_item(product, product.is_active);
        set_item_version(&mut item, version + 1);

        self.store
            .put_item(
                &self.tables.products,
                &product_key(&product.id),
                item,
                PutCondition::VersionEquals(version),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use catalog_core::item::{keys, AttributeValue, Item};
    use catalog_core::storage::{ItemStore, Key, Page, Query};
    use rust_decimal::Decimal;

    use super::*;
    use crate::service::Tables;
    use crate::storage::InMemoryStore;

    fn service_with(store: InMemoryStore) -> CatalogService {
        CatalogService::new(Arc::new(store), Tables::default())
    }

    fn payload(owner: &str, name: &str) -> ProductPayload {
        ProductPayload {
            name: name.to_string(),
            description: "A product".to_string(),
            price: Decimal::new(4990, 2),
            category: "Misc".to_string(),
            owner_id: owner.to_string(),
            ..ProductPayload::default()
        }
    }

    async fn stored_item(store: &InMemoryStore, id: &str) -> Option<Item> {
        store
            .get_item("catalog-products", &keys::product_key(id))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_generates_id_and_activates() {
        let store = InMemoryStore::new();
        let service = service_with(store.clone());

        let mut body = payload("o-1", "Red Shoes");
        body.id = Some("client-chosen".to_string());
        body.is_active = false;

        let product = service.create_product(body).await.unwrap();

        assert_ne!(product.id, "client-chosen");
        assert!(Uuid::parse_str(&product.id).is_ok());
        assert!(product.is_active);

        let item = stored_item(&store, &product.id).await.unwrap();
        assert_eq!(item.get("Active"), Some(&AttributeValue::S("true".to_string())));
        assert_eq!(item.get("Version"), Some(&AttributeValue::N("1".to_string())));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_payload() {
        let service = service_with(InMemoryStore::new());

        let result = service.create_product(payload("o-1", "  ")).await;
        assert_eq!(
            result,
            Err(RepositoryError::Validation(
                "Product name cannot be empty".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_price_is_stored_with_two_decimals() {
        let store = InMemoryStore::new();
        let service = service_with(store.clone());

        let mut body = payload("o-1", "Hat");
        body.price = Decimal::new(9, 0);
        let product = service.create_product(body).await.unwrap();

        let item = stored_item(&store, &product.id).await.unwrap();
        assert_eq!(item.get("Price"), Some(&AttributeValue::S("9.00".to_string())));

        let fetched = service.get_product(&product.id).await.unwrap();
        assert_eq!(fetched.price, Decimal::new(900, 2));
    }

    #[tokio::test]
    async fn test_price_with_extra_decimals_is_rejected() {
        let store = InMemoryStore::new();
        let service = service_with(store.clone());
        let created = service.create_product(payload("o-1", "Hat")).await.unwrap();

        let mut body = payload("o-1", "Hat");
        body.price = Decimal::new(19999, 3);
        assert_eq!(
            service.create_product(body.clone()).await,
            Err(RepositoryError::Validation(
                "Price cannot have more than two decimal places".to_string()
            ))
        );
        assert!(matches!(
            service.update_product(&created.id, body).await,
            Err(RepositoryError::Validation(_))
        ));

        let item = stored_item(&store, &created.id).await.unwrap();
        assert_eq!(item.get("Price"), Some(&AttributeValue::S("49.90".to_string())));
    }

    #[tokio::test]
    async fn test_get_missing_product_is_not_found() {
        let service = service_with(InMemoryStore::new());

        assert!(matches!(
            service.get_product("missing").await,
            Err(RepositoryError::NotFound { entity_type: "Product", .. })
        ));
        assert!(matches!(
            service.get_product("").await,
            Err(RepositoryError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_update_uses_path_id_and_payload_flag() {
        let store = InMemoryStore::new();
        let service = service_with(store.clone());
        let created = service.create_product(payload("o-1", "Hat")).await.unwrap();

        let mut body = payload("o-1", "Blue Hat");
        body.id = Some("other-id".to_string());
        body.is_active = true;
        let updated = service.update_product(&created.id, body).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Blue Hat");
        assert!(stored_item(&store, "other-id").await.is_none());

        let item = stored_item(&store, &created.id).await.unwrap();
        assert_eq!(item.get("Version"), Some(&AttributeValue::N("2".to_string())));
        assert_eq!(
            item.get("ProductNameLower"),
            Some(&AttributeValue::S("blue hat".to_string()))
        );
    }

    #[tokio::test]
    async fn test_update_missing_product_writes_nothing() {
        let store = InMemoryStore::new();
        let service = service_with(store.clone());

        let result = service.update_product("ghost", payload("o-1", "Hat")).await;

        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
        assert!(stored_item(&store, "ghost").await.is_none());
    }

    #[tokio::test]
    async fn test_soft_delete_then_reactivate() {
        let service = service_with(InMemoryStore::new());
        let created = service.create_product(payload("o-1", "Hat")).await.unwrap();

        let deactivated = service.deactivate_product(&created.id).await.unwrap();
        assert!(!deactivated.is_active);
        assert!(!service.get_product(&created.id).await.unwrap().is_active);

        let mut body = payload("o-1", "Hat");
        body.is_active = true;
        service.update_product(&created.id, body).await.unwrap();
        assert!(service.get_product(&created.id).await.unwrap().is_active);
    }

    #[tokio::test]
    async fn test_update_without_flag_deactivates() {
        let service = service_with(InMemoryStore::new());
        let created = service.create_product(payload("o-1", "Hat")).await.unwrap();

        service
            .update_product(&created.id, payload("o-1", "Hat"))
            .await
            .unwrap();

        assert!(!service.get_product(&created.id).await.unwrap().is_active);
    }

    #[tokio::test]
    async fn test_deactivate_missing_or_blank_id() {
        let service = service_with(InMemoryStore::new());

        assert!(matches!(
            service.deactivate_product("ghost").await,
            Err(RepositoryError::NotFound { .. })
        ));
        assert!(matches!(
            service.deactivate_product(" ").await,
            Err(RepositoryError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_hard_delete_twice_is_not_found() {
        let store = InMemoryStore::new();
        let service = service_with(store.clone());
        let created = service.create_product(payload("o-1", "Hat")).await.unwrap();

        service.delete_product(&created.id).await.unwrap();
        assert!(stored_item(&store, &created.id).await.is_none());

        assert!(matches!(
            service.delete_product(&created.id).await,
            Err(RepositoryError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_stale_version_is_a_conflict() {
        let store = InMemoryStore::new();
        let service = service_with(store.clone());
        let created = service.create_product(payload("o-1", "Hat")).await.unwrap();

        // A concurrent writer already moved the item to version 2.
        service
            .update_product(&created.id, payload("o-1", "Cap"))
            .await
            .unwrap();

        let result = service.write_next_version(&created, 1).await;
        assert_eq!(
            result,
            Err(RepositoryError::Conflict {
                entity_type: "Product",
                id: created.id.clone(),
            })
        );
        assert_eq!(service.get_product(&created.id).await.unwrap().name, "Cap");
    }

    #[tokio::test]
    async fn test_unversioned_items_can_be_updated() {
        let store = InMemoryStore::new();
        let service = service_with(store.clone());

        let legacy = Product::new("o-1", "Old Hat", Decimal::new(100, 2)).with_id("legacy-1");
        store
            .put_item(
                "catalog-products",
                &keys::product_key("legacy-1"),
                product_to_item(&legacy, true),
                PutCondition::Always,
            )
            .await
            .unwrap();

        service.deactivate_product("legacy-1").await.unwrap();

        let item = stored_item(&store, "legacy-1").await.unwrap();
        assert_eq!(item.get("Version"), Some(&AttributeValue::N("1".to_string())));
        assert_eq!(item.get("Active"), Some(&AttributeValue::S("false".to_string())));
    }

    #[tokio::test]
    async fn test_query_collects_every_page() {
        let service = service_with(InMemoryStore::new().with_page_size(3));
        for i in 0..10 {
            service
                .create_product(payload("o-1", &format!("Item {i}")))
                .await
                .unwrap();
        }
        service.create_product(payload("o-2", "Other")).await.unwrap();

        let products = service.query_by_owner("o-1", None).await.unwrap();

        assert_eq!(products.len(), 10);
        assert!(products.iter().all(|p| p.owner_id == "o-1"));
    }

    #[tokio::test]
    async fn test_query_name_filter_is_case_insensitive() {
        let service = service_with(InMemoryStore::new().with_page_size(1));
        service.create_product(payload("o-1", "Red Shoes")).await.unwrap();
        service.create_product(payload("o-1", "Blue Hat")).await.unwrap();

        for term in ["red", "RED", "shoe", " Shoes"] {
            let products = service.query_by_owner("o-1", Some(term)).await.unwrap();
            assert_eq!(products.len(), 1, "term {term:?}");
            assert_eq!(products[0].name, "Red Shoes");
        }

        let all = service.query_by_owner("o-1", Some("")).await.unwrap();
        assert_eq!(all.len(), 2);

        // Spaces are matched, not trimmed.
        let spaced = service.query_by_owner("o-1", Some(" H")).await.unwrap();
        assert_eq!(spaced.len(), 1);
        assert_eq!(spaced[0].name, "Blue Hat");

        let none = service.query_by_owner("o-1", Some("boots")).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_query_skips_undecodable_items() {
        let store = InMemoryStore::new();
        let service = service_with(store.clone());
        service.create_product(payload("o-1", "Hat")).await.unwrap();

        let mut broken = product_to_item(
            &Product::new("o-1", "Broken", Decimal::ZERO).with_id("broken"),
            true,
        );
        broken.insert("Price".to_string(), AttributeValue::S("abc".to_string()));
        store
            .put_item(
                "catalog-products",
                &keys::product_key("broken"),
                broken,
                PutCondition::Always,
            )
            .await
            .unwrap();

        let products = service.query_by_owner("o-1", None).await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Hat");

        assert!(matches!(
            service.get_product("broken").await,
            Err(RepositoryError::InvalidData(_))
        ));
    }

    /// Serves one page with a continuation key, then fails.
    struct FailsOnSecondPage;

    #[async_trait::async_trait]
    impl ItemStore for FailsOnSecondPage {
        async fn get_item(&self, _table: &str, _key: &Key) -> Result<Option<Item>> {
            unreachable!()
        }

        async fn put_item(
            &self,
            _table: &str,
            _key: &Key,
            _item: Item,
            _condition: PutCondition,
        ) -> Result<()> {
            unreachable!()
        }

        async fn set_attribute(
            &self,
            _table: &str,
            _key: &Key,
            _attribute: &str,
            _value: AttributeValue,
        ) -> Result<()> {
            unreachable!()
        }

        async fn delete_item(&self, _table: &str, _key: &Key) -> Result<()> {
            unreachable!()
        }

        async fn query_page(&self, _query: &Query, start: Option<Item>) -> Result<Page> {
            match start {
                None => {
                    let product = Product::new("o-1", "Hat", Decimal::ZERO).with_id("p-1");
                    Ok(Page {
                        items: vec![product_to_item(&product, true)],
                        last_evaluated_key: Some(keys::product_key("p-1").to_item()),
                    })
                }
                Some(_) => Err(RepositoryError::ConnectionFailed("down".to_string())),
            }
        }

        async fn check_table(&self, _table: &str) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_query_failure_on_later_page_returns_no_products() {
        let service = CatalogService::new(Arc::new(FailsOnSecondPage), Tables::default());

        let result = service.query_by_owner("o-1", None).await;

        assert_eq!(
            result,
            Err(RepositoryError::ConnectionFailed("down".to_string()))
        );
    }

    #[tokio::test]
    async fn test_query_requires_owner() {
        let service = service_with(InMemoryStore::new());

        assert!(matches!(
            service.query_by_owner(" ", None).await,
            Err(RepositoryError::Validation(_))
        ));
    }
}
