//! End-to-end checks: counts recorded through the store, suggestions computed
//! from a snapshot by the service.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, NaiveDate};

    use m2go_catalog::Product;
    use m2go_core::{DomainError, Entity, VariantId};
    use m2go_inventory::CountEntry;
    use m2go_ordering::settings::{COVER_DAYS_MONDAY, SAFETY_BUFFER_DAYS};
    use m2go_ordering::{Diagnostic, MixPoolTable, Order, OrderStatus, OrderSuggestion, OrderUnit};

    use crate::service::{SuggestError, SuggestionService};
    use crate::store::{InMemoryStockStore, StockStore, StoreError};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn as_of() -> NaiveDate {
        day(20)
    }

    /// Counts on consecutive days ending at `as_of`.
    fn record_series(store: &InMemoryStockStore, variant_id: VariantId, qtys: &[f64]) {
        let n = qtys.len() as i64;
        for (i, q) in qtys.iter().enumerate() {
            let date = as_of() - Duration::days(n - 1 - i as i64);
            store.record_count(CountEntry::new(variant_id, date, *q)).unwrap();
        }
    }

    fn add_product(
        store: &InMemoryStockStore,
        mut product: Product,
        form: &str,
        conversion: Option<f64>,
    ) -> VariantId {
        let mut variant = product.variant(form, "box_4inch", format!("{} {form}", product.name));
        if let Some(c) = conversion {
            variant = variant.with_conversion(c);
        }
        let id = variant.id;
        product.add_variant(variant).unwrap();
        store.upsert_product(product).unwrap();
        id
    }

    fn line<'a>(lines: &'a [OrderSuggestion], name: &str) -> &'a OrderSuggestion {
        lines
            .iter()
            .find(|l| l.product_name == name)
            .unwrap_or_else(|| panic!("no line for {name}"))
    }

    fn service(store: Arc<InMemoryStockStore>) -> SuggestionService<Arc<InMemoryStockStore>> {
        SuggestionService::new(store, MixPoolTable::standard())
    }

    #[test]
    fn protein_orders_whole_cases() {
        let store = Arc::new(InMemoryStockStore::new());
        let chicken = Product::new("鸡腿", "Chicken", "protein", "chill").with_case_size(10.0);
        let variant_id = add_product(&store, chicken, "RAW", Some(10.0));
        // 3 cases/day, nothing left
        record_series(&store, variant_id, &[6.0, 3.0, 0.0]);
        store.put_setting(COVER_DAYS_MONDAY, "4").unwrap();
        store.put_setting(SAFETY_BUFFER_DAYS, "0").unwrap();

        let svc = service(store.clone());
        let lines = svc.suggest("MONDAY", as_of()).unwrap();
        let chicken = line(&lines, "鸡腿");
        assert_eq!(chicken.reason.daily_demand, 30.0);
        assert_eq!(chicken.reason.target_stock, 120.0);
        assert_eq!(chicken.final_quantity, 12.0);
        assert_eq!(chicken.suggested_quantity, 12.0);
        assert_eq!(chicken.unit, OrderUnit::Case);
        assert!(chicken.loading_risk);

        // a tenth of a day more pushes it over a case boundary
        store.put_setting(SAFETY_BUFFER_DAYS, "0.1").unwrap();
        let lines = svc.suggest("monday", as_of()).unwrap();
        assert_eq!(line(&lines, "鸡腿").final_quantity, 13.0);
    }

    #[test]
    fn missing_conversion_is_reported_at_zero() {
        let store = Arc::new(InMemoryStockStore::new());
        let cabbage = Product::new("白菜", "Cabbage", "veg", "room");
        let variant_id = add_product(&store, cabbage, "RAW", None);
        record_series(&store, variant_id, &[5.0, 5.0, 5.0]);

        let lines = service(store).suggest("FRIDAY", as_of()).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].final_quantity, 0.0);
        assert!(lines[0].notes.contains("missing conversion"));
        assert!(lines[0].has_missing_conversion());
    }

    #[test]
    fn shred_pool_splits_two_one_one() {
        let store = Arc::new(InMemoryStockStore::new());
        let carrot = add_product(&store, Product::new("胡萝卜", "Carrot", "veg", "room"), "PREP_shred", Some(1.0));
        let onion = add_product(&store, Product::new("洋葱", "Onion", "veg", "room"), "PREP_shred", Some(1.0));
        let scallion = add_product(&store, Product::new("青葱", "Scallion", "veg", "room"), "PREP_shred", Some(1.0));
        // pooled usage: 4 + 2 + 2 = 8/day
        record_series(&store, carrot, &[8.0, 4.0, 0.0]);
        record_series(&store, onion, &[4.0, 2.0, 0.0]);
        record_series(&store, scallion, &[4.0, 2.0, 0.0]);
        store.put_setting(COVER_DAYS_MONDAY, "1").unwrap();
        store.put_setting(SAFETY_BUFFER_DAYS, "0").unwrap();

        let lines = service(store).suggest("MONDAY", as_of()).unwrap();
        assert_eq!(line(&lines, "胡萝卜").final_quantity, 4.0);
        assert_eq!(line(&lines, "洋葱").final_quantity, 2.0);
        assert_eq!(line(&lines, "青葱").final_quantity, 2.0);
        assert!(line(&lines, "洋葱")
            .reason
            .details
            .iter()
            .any(|d| d.contains("2:1:1")));
    }

    #[test]
    fn chunk_variant_is_not_pooled() {
        let store = Arc::new(InMemoryStockStore::new());
        let carrot = add_product(&store, Product::new("胡萝卜", "Carrot", "veg", "room"), "PREP_chunk", Some(1.0));
        record_series(&store, carrot, &[10.0, 5.0, 0.0]);
        store.put_setting(COVER_DAYS_MONDAY, "1").unwrap();
        store.put_setting(SAFETY_BUFFER_DAYS, "0").unwrap();

        let lines = service(store).suggest("MONDAY", as_of()).unwrap();
        let carrot = line(&lines, "胡萝卜");
        assert_eq!(carrot.reason.daily_demand, 5.0);
        assert_eq!(carrot.final_quantity, 5.0);
        assert_eq!(carrot.unit, OrderUnit::BaseUnit);
    }

    #[test]
    fn well_stocked_products_are_omitted() {
        let store = Arc::new(InMemoryStockStore::new());
        let rice = add_product(&store, Product::new("米", "Rice", "other", "room"), "RAW", Some(1.0));
        record_series(&store, rice, &[100.0, 99.0, 98.0]);
        store.put_setting(SAFETY_BUFFER_DAYS, "0").unwrap();

        let lines = service(store).suggest("MONDAY", as_of()).unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn short_history_is_flagged_on_the_line() {
        let store = Arc::new(InMemoryStockStore::new());
        let beef = Product::new("牛肉", "Beef", "protein", "frozen").with_case_size(5.0);
        let variant_id = add_product(&store, beef, "RAW", None);
        record_series(&store, variant_id, &[2.0, 1.0]);

        let lines = service(store).suggest("MONDAY", as_of()).unwrap();
        let beef = line(&lines, "牛肉");
        assert!(beef.has(&Diagnostic::InsufficientData));
        assert!(beef.notes.contains("insufficient data"));
    }

    #[test]
    fn deactivated_products_are_skipped() {
        let store = Arc::new(InMemoryStockStore::new());
        let cabbage = Product::new("白菜", "Cabbage", "veg", "room");
        let product_id = cabbage.id;
        add_product(&store, cabbage, "RAW", None);
        store.deactivate_product(product_id).unwrap();

        let lines = service(store).suggest("MONDAY", as_of()).unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn malformed_setting_fails_the_run() {
        let store = Arc::new(InMemoryStockStore::new());
        store.put_setting(SAFETY_BUFFER_DAYS, "abc").unwrap();

        let err = service(store).suggest("MONDAY", as_of()).unwrap_err();
        assert!(matches!(err, SuggestError::Ordering(_)));
    }

    #[test]
    fn drafted_order_is_edited_confirmed_and_read_back() {
        let store = Arc::new(InMemoryStockStore::new());
        let chicken = Product::new("鸡腿", "Chicken", "protein", "chill")
            .with_case_size(10.0)
            .with_supplier("Sysco");
        let product_id = chicken.id;
        let variant_id = add_product(&store, chicken, "RAW", Some(10.0));
        record_series(&store, variant_id, &[6.0, 3.0, 0.0]);

        let svc = service(store);
        assert_eq!(svc.pools(), &MixPoolTable::standard());
        let mut order = svc.draft_order("monday", as_of()).unwrap();
        assert_eq!(order.status(), OrderStatus::Draft);
        assert_eq!(order.order_date(), as_of());
        assert_eq!(order.cycle(), "MONDAY");

        let saved = svc.store().order(order.id()).unwrap().unwrap();
        assert_eq!(saved, order);

        let suggested = order.line(product_id).unwrap().suggested_quantity;
        order.edit_final_quantity(product_id, suggested + 1.0).unwrap();
        order.confirm().unwrap();
        svc.store().save_order(order.clone()).unwrap();

        let stored = svc.store().order(order.id()).unwrap().unwrap();
        assert!(stored.is_confirmed());
        let line = stored.line(product_id).unwrap();
        assert_eq!(line.final_quantity, suggested + 1.0);
        assert_eq!(line.suggested_quantity, suggested);
    }

    #[test]
    fn confirmed_order_cannot_be_overwritten() {
        let store = Arc::new(InMemoryStockStore::new());
        let chicken = Product::new("鸡腿", "Chicken", "protein", "chill").with_case_size(10.0);
        let product_id = chicken.id;
        let variant_id = add_product(&store, chicken, "RAW", Some(10.0));
        record_series(&store, variant_id, &[6.0, 3.0, 0.0]);

        let svc = service(store);
        let mut order = svc.draft_order("MONDAY", as_of()).unwrap();
        order.confirm().unwrap();
        svc.store().save_order(order.clone()).unwrap();

        assert!(order.edit_final_quantity(product_id, 0.0).is_err());
        let err = svc.store().save_order(order.clone()).unwrap_err();
        assert!(matches!(err, StoreError::Domain(DomainError::InvariantViolation(_))));
        assert!(svc.store().order(order.id()).unwrap().unwrap().is_confirmed());
    }

    #[test]
    fn order_lines_must_name_known_products() {
        let store = Arc::new(InMemoryStockStore::new());
        let chicken = Product::new("鸡腿", "Chicken", "protein", "chill").with_case_size(10.0);
        let variant_id = add_product(&store, chicken, "RAW", Some(10.0));
        record_series(&store, variant_id, &[6.0, 3.0, 0.0]);
        let suggestions = service(store.clone()).suggest("MONDAY", as_of()).unwrap();

        let other = Arc::new(InMemoryStockStore::new());
        let order = Order::draft("MONDAY", as_of(), suggestions, chrono::Utc::now());
        let err = other.save_order(order.clone()).unwrap_err();
        assert!(matches!(err, StoreError::UnknownProduct(_)));
        assert!(other.order(order.id()).unwrap().is_none());
    }
}
