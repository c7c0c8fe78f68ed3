use std::fmt::Write as _;

use proptest::prelude::*;
use sheetmap_map::{MappingEngine, MappingError, MappingOptions, map_collections};
use sheetmap_model::{
    CellValue, CollectionAnalysis, FieldInfo, FieldType, MappingResult, Record, TargetTable,
    TransformationNeeded, UnmappedReason, ValidationError,
};
use sheetmap_standards::SchemaRegistry;

fn registry() -> SchemaRegistry {
    SchemaRegistry::builtin().expect("builtin schema")
}

fn sheet(engine: &MappingEngine<'_>, name: &str, headers: &[&str], rows: &[&[&str]]) -> CollectionAnalysis {
    let headers: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let records: Vec<Record> = rows
        .iter()
        .map(|row| {
            headers
                .iter()
                .zip(row.iter())
                .map(|(header, value)| (header.clone(), CellValue::from(*value)))
                .collect()
        })
        .collect();
    engine.analyze(name, &headers, &records)
}

fn inventory_sheet(engine: &MappingEngine<'_>) -> CollectionAnalysis {
    sheet(
        engine,
        "biztrack_inventory_tracker",
        &["Item ID", "Item name", "Type", "Price", "Stock", "Status", "Notes"],
        &[
            &["P001", "Samsung Galaxy S23", "Electronics", "85000", "50", "Active", "Latest model with 5G support"],
            &["P002", "Office Desk", "Furniture", "12000", "20", "Active", "Ergonomic design"],
            &["P003", "LED Monitor 24\"", "Electronics", "18000", "35", "Active", "Full HD display"],
        ],
    )
}

fn vendor_sheet(engine: &MappingEngine<'_>) -> CollectionAnalysis {
    sheet(
        engine,
        "biztrack_vendor_list",
        &["Vendor", "Vendor type", "Contact", "Address", "Website", "Reliability", "Notes"],
        &[
            &["ABC Electronics Ltd", "Wholesale", "Kamal Ahmed - 01712345678", "Gulshan-2, Dhaka", "www.abcelectronics.com.bd", "High", "Preferred supplier for electronics"],
            &["XYZ Furniture House", "Retail", "Rina Begum - 01898765432", "Banani, Dhaka", "www.xyzfurniture.com", "Medium", "New vendor, trial period"],
        ],
    )
}

fn purchase_order_sheet(engine: &MappingEngine<'_>) -> CollectionAnalysis {
    sheet(
        engine,
        "biztrack_purchase_orders",
        &["Priority", "Order", "Category", "Status", "Order date", "Arrive by", "Cost", "Point of contact", "Notes"],
        &[
            &["High", "PO-2025-001", "Electronics", "Pending", "2025-01-15", "2025-01-20", "500000", "ABC Electronics Ltd", "Urgent order for new store opening"],
            &["Medium", "PO-2025-002", "Furniture", "Confirmed", "2025-01-16", "2025-01-25", "300000", "XYZ Furniture House", "Regular monthly order"],
        ],
    )
}

fn sales_order_sheet(engine: &MappingEngine<'_>) -> CollectionAnalysis {
    sheet(
        engine,
        "biztrack_sales_orders",
        &["Priority", "Order", "Product", "Status", "Order date", "Price", "Sales platform", "Point of contact", "Notes"],
        &[
            &["High", "SO-2025-001", "Samsung Galaxy S23", "Shipped", "2025-01-15", "90000", "Daraz", "Customer A - 01723456789", "Express delivery requested"],
            &["Medium", "SO-2025-002", "Office Desk", "Pending", "2025-01-16", "15000", "Facebook Marketplace", "Customer B - 01834567890", "Normal delivery"],
        ],
    )
}

fn assert_covers_every_field(analysis: &CollectionAnalysis, result: &MappingResult) {
    assert!(!result.tables.is_empty());
    assert_eq!(result.accounted_fields(), analysis.fields.len());
}

fn summarize(result: &MappingResult) -> String {
    let mut out = String::new();
    let best = &result.tables[0];
    writeln!(out, "table: {} ({:.4})", best.table_name, best.confidence).unwrap();
    writeln!(out, "reasoning: {}", best.reasoning).unwrap();
    for mapping in &best.field_mappings {
        writeln!(
            out,
            "{} -> {} ({:.4}, {})",
            mapping.source_field, mapping.target_field, mapping.confidence, mapping.transformation_needed
        )
        .unwrap();
    }
    for relationship in &best.relationships {
        writeln!(
            out,
            "relationship: {} -> {}.{}",
            relationship.key, relationship.related_table, relationship.related_field
        )
        .unwrap();
    }
    let candidates: Vec<String> = result
        .tables
        .iter()
        .map(|t| format!("{} {:.4}", t.table_name, t.confidence))
        .collect();
    writeln!(out, "candidates: {}", candidates.join(", ")).unwrap();
    writeln!(out, "unmapped: {}", result.unmapped_fields.len()).unwrap();
    out
}

#[test]
fn inventory_sheet_maps_to_inventory() {
    let registry = registry();
    let engine = MappingEngine::new(&registry, MappingOptions::default());
    let analysis = inventory_sheet(&engine);
    let result = engine.map(&analysis).unwrap();
    assert_covers_every_field(&analysis, &result);

    let best = &result.tables[0];
    assert_eq!(best.table_name, TargetTable::Inventory);
    assert!((best.confidence - 0.9143).abs() < 1e-9);

    let item_id = best.mapping_for("Item ID").unwrap();
    assert_eq!(item_id.target_field, "id");
    assert_eq!(item_id.confidence, 1.0);
    assert_eq!(best.mapping_for("Item name").unwrap().target_field, "name");
    assert_eq!(best.mapping_for("Type").unwrap().target_field, "category");
    let price = best.mapping_for("Price").unwrap();
    assert_eq!(price.target_field, "price");
    assert!((price.confidence - 0.8).abs() < 1e-9);
    assert_eq!(price.transformation_needed, TransformationNeeded::None);
    assert_eq!(best.mapping_for("Notes").unwrap().target_field, "description");

    assert!(best.relationships.is_empty());
    assert!(result.unmapped_fields.is_empty());

    let order: Vec<TargetTable> = result.tables.iter().map(|t| t.table_name).collect();
    assert_eq!(
        order,
        vec![
            TargetTable::Inventory,
            TargetTable::SalesOrder,
            TargetTable::PurchaseOrder,
            TargetTable::Vendor,
        ]
    );
}

#[test]
fn vendor_sheet_maps_to_vendor() {
    let registry = registry();
    let engine = MappingEngine::new(&registry, MappingOptions::default());
    let analysis = vendor_sheet(&engine);
    let result = engine.map(&analysis).unwrap();
    assert_covers_every_field(&analysis, &result);

    let best = &result.tables[0];
    assert_eq!(best.table_name, TargetTable::Vendor);
    assert!((best.confidence - 0.9714).abs() < 1e-9);
    let targets: Vec<&str> = best.field_mappings.iter().map(|m| m.target_field.as_str()).collect();
    assert_eq!(
        targets,
        vec!["name", "vendor_type", "contact", "address", "website", "reliability", "notes"]
    );
    assert!(best.reasoning.starts_with("matched 7/7 fields to vendor patterns"));
}

#[test]
fn purchase_order_sheet_maps_to_purchase_order() {
    let registry = registry();
    let engine = MappingEngine::new(&registry, MappingOptions::default());
    let analysis = purchase_order_sheet(&engine);
    let result = engine.map(&analysis).unwrap();
    assert_covers_every_field(&analysis, &result);

    let best = &result.tables[0];
    assert_eq!(best.table_name, TargetTable::PurchaseOrder);

    let order_date = best.mapping_for("Order date").unwrap();
    assert_eq!(order_date.target_field, "order_date");
    assert_eq!(order_date.transformation_needed, TransformationNeeded::ParseDate);

    assert_eq!(best.relationships.len(), 1);
    assert_eq!(best.relationships[0].related_table, TargetTable::Vendor);
    assert_eq!(best.relationships[0].key, "Point of contact");

    insta::assert_snapshot!("purchase_order_sheet", summarize(&result));
}

#[test]
fn sales_order_sheet_maps_to_sales_order() {
    let registry = registry();
    let engine = MappingEngine::new(&registry, MappingOptions::default());
    let analysis = sales_order_sheet(&engine);
    let result = engine.map(&analysis).unwrap();
    assert_covers_every_field(&analysis, &result);

    let best = &result.tables[0];
    assert_eq!(best.table_name, TargetTable::SalesOrder);
    assert!((best.confidence - 0.8222).abs() < 1e-9);
    assert_eq!(best.mapping_for("Sales platform").unwrap().target_field, "platform");
    assert_eq!(best.mapping_for("Point of contact").unwrap().target_field, "customer_contact");
    assert_eq!(result.tables[1].table_name, TargetTable::PurchaseOrder);

    let related: Vec<(TargetTable, &str)> = best
        .relationships
        .iter()
        .map(|r| (r.related_table, r.key.as_str()))
        .collect();
    assert_eq!(related, vec![(TargetTable::Inventory, "Product")]);
}

#[test]
fn junk_headers_fall_back_with_zero_confidence() {
    let registry = registry();
    let engine = MappingEngine::new(&registry, MappingOptions::default());
    let analysis = sheet(
        &engine,
        "junk",
        &["x1", "x2", "x3"],
        &[&["a", "b", "c"], &["d", "e", "f"]],
    );
    let result = engine.map(&analysis).unwrap();
    assert_covers_every_field(&analysis, &result);

    assert_eq!(result.tables.len(), 1);
    let best = &result.tables[0];
    assert_eq!(best.table_name, TargetTable::Inventory);
    assert_eq!(best.confidence, 0.0);
    assert!(best.field_mappings.is_empty());
    assert!(best.reasoning.starts_with("no field matched"));
    assert_eq!(result.unmapped_fields.len(), 3);
    for unmapped in &result.unmapped_fields {
        assert_eq!(unmapped.reason, UnmappedReason::NoPatternMatch);
        assert!(unmapped.suggestions.is_empty());
    }
    assert!(!result.has_confident_table(&engine.options().thresholds));
}

#[test]
fn equal_scores_prefer_table_priority() {
    let registry = registry();
    let engine = MappingEngine::new(&registry, MappingOptions::default());
    let analysis = sheet(&engine, "notes_only", &["Notes"], &[&["Fragile"]]);
    let result = engine.map(&analysis).unwrap();

    let order: Vec<TargetTable> = result.tables.iter().map(|t| t.table_name).collect();
    assert_eq!(order, TargetTable::ALL.to_vec());
    assert_eq!(result.tables[0].field_mappings[0].target_field, "description");
    assert!(result.tables[0].reasoning.contains("1 ambiguous field"));
}

#[test]
fn mapping_is_deterministic() {
    let registry = registry();
    let engine = MappingEngine::new(&registry, MappingOptions::default());
    for analysis in [
        inventory_sheet(&engine),
        vendor_sheet(&engine),
        purchase_order_sheet(&engine),
        sales_order_sheet(&engine),
    ] {
        let first = serde_json::to_string(&engine.map(&analysis).unwrap()).unwrap();
        let second = serde_json::to_string(&engine.map(&analysis).unwrap()).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn output_uses_wire_names() {
    let registry = registry();
    let engine = MappingEngine::new(&registry, MappingOptions::default());
    let result = engine.map(&purchase_order_sheet(&engine)).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    let table = &json["tables"][0];
    assert_eq!(table["table_name"], "purchase_order");
    let order_date = table["field_mappings"]
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["source_field"] == "Order date")
        .unwrap();
    assert_eq!(order_date["transformation_needed"], "parse-date");
    assert_eq!(table["relationships"][0]["related_table"], "vendor");
    assert!(json["unmapped_fields"].as_array().unwrap().is_empty());
}

#[test]
fn collections_map_independently_in_order() {
    let registry = registry();
    let engine = MappingEngine::new(&registry, MappingOptions::default());
    let analyses = vec![
        vendor_sheet(&engine),
        CollectionAnalysis {
            collection_name: "empty".to_string(),
            total_documents: 0,
            sample_data: Vec::new(),
            fields: Vec::new(),
        },
        sales_order_sheet(&engine),
    ];
    let results = map_collections(&engine, &analyses);
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap().tables[0].table_name, TargetTable::Vendor);
    assert!(results[1].is_err());
    assert_eq!(results[2].as_ref().unwrap().tables[0].table_name, TargetTable::SalesOrder);
}

const PRECATEGORIZED: &str = r#"{
    "collectionName": "stock_sheet",
    "totalDocuments": 2,
    "sampleData": [
        {"Item ID": "P001", "Stock count": 12},
        {"Item ID": "P002", "Stock count": 4}
    ],
    "fields": [
        {
            "fieldName": "Item ID",
            "dataType": "identifier",
            "fieldCategory": {"category": "inventory", "fieldType": "id", "matchedPattern": "item id"}
        },
        {
            "fieldName": "Stock count",
            "dataType": "integer",
            "fieldCategory": {"category": "inventory", "fieldType": "stock", "matchedPattern": "stock"}
        }
    ]
}"#;

#[test]
fn supplied_categories_without_confidence_are_scored() {
    let registry = registry();
    let engine = MappingEngine::new(&registry, MappingOptions::default());
    let analysis: CollectionAnalysis = serde_json::from_str(PRECATEGORIZED).unwrap();

    let result = engine.map(&analysis).unwrap();

    let best = &result.tables[0];
    assert_eq!(best.table_name, TargetTable::Inventory);
    assert_eq!(best.mapping_for("Item ID").map(|m| m.confidence), Some(1.0));
    // "stock" covers 5 of the 11 characters of "stock count".
    assert_eq!(best.mapping_for("Stock count").map(|m| m.confidence), Some(0.4545));
    assert!(result.unmapped_fields.is_empty());
}

#[test]
fn supplied_confidence_out_of_range_is_rejected() {
    let registry = registry();
    let engine = MappingEngine::new(&registry, MappingOptions::default());
    let json = PRECATEGORIZED.replacen(
        r#""matchedPattern": "item id"}"#,
        r#""matchedPattern": "item id", "confidence": 7.5}"#,
        1,
    );
    let analysis: CollectionAnalysis = serde_json::from_str(&json).unwrap();

    let err = engine.map(&analysis).unwrap_err();
    assert!(matches!(
        err,
        MappingError::Validation(ValidationError::InvalidConfidence { ref field, confidence, .. })
            if field == "Item ID" && confidence == 7.5
    ));
}

#[test]
fn strict_options_drop_weak_mappings() {
    let registry = registry();
    let engine = MappingEngine::new(&registry, MappingOptions::strict());
    let analysis = CollectionAnalysis {
        collection_name: "weak".to_string(),
        total_documents: 1,
        sample_data: Vec::new(),
        fields: vec![
            FieldInfo::new("Vendor", FieldType::String).with_samples(["ABC"]),
            // "stock" covers 5 of 24 characters.
            FieldInfo::new("Stock kept at the branch", FieldType::Integer).with_samples(["3"]),
        ],
    };
    let result = engine.map(&analysis).unwrap();
    assert_eq!(result.tables[0].table_name, TargetTable::Vendor);
    let inventory = result
        .tables
        .iter()
        .find(|t| t.table_name == TargetTable::Inventory)
        .unwrap();
    assert!(inventory.field_mappings.is_empty());
    assert_eq!(result.unmapped_fields[0].reason, UnmappedReason::OtherTable);
}

const HEADER_POOL: [&str; 16] = [
    "Item ID", "Item name", "Price", "Stock", "Vendor", "Contact", "Order", "Order date",
    "Arrive by", "Point of contact", "Notes", "Status", "x1", "Qty", "Sales platform", "Adress",
];

const VALUE_POOL: [&str; 8] = [
    "P001", "Samsung Galaxy S23", "85000", "2025-01-15", " padded ", "", "yes", "12.5",
];

fn analysis_strategy() -> impl Strategy<Value = CollectionAnalysis> {
    prop::sample::subsequence(HEADER_POOL.to_vec(), 1..HEADER_POOL.len())
        .prop_flat_map(|headers| {
            let n = headers.len();
            (
                Just(headers),
                prop::collection::vec(prop::collection::vec(0..VALUE_POOL.len(), n), 1..4),
            )
        })
        .prop_map(|(headers, rows)| {
            let sample_data: Vec<Record> = rows
                .iter()
                .map(|row| {
                    headers
                        .iter()
                        .zip(row)
                        .map(|(h, v)| (h.to_string(), CellValue::from(VALUE_POOL[*v])))
                        .collect()
                })
                .collect();
            let fields = headers
                .iter()
                .map(|h| FieldInfo::new(*h, FieldType::String))
                .collect();
            CollectionAnalysis {
                collection_name: "generated".to_string(),
                total_documents: sample_data.len(),
                sample_data,
                fields,
            }
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_field_is_accounted_for(analysis in analysis_strategy()) {
        let registry = registry();
        let engine = MappingEngine::new(&registry, MappingOptions::default());
        let result = engine.map(&analysis).unwrap();
        prop_assert!(!result.tables.is_empty());
        prop_assert_eq!(result.accounted_fields(), analysis.fields.len());

        let mut targets: Vec<&str> = result.tables[0]
            .field_mappings
            .iter()
            .map(|m| m.target_field.as_str())
            .collect();
        let total = targets.len();
        targets.sort_unstable();
        targets.dedup();
        prop_assert_eq!(targets.len(), total);

        for table in &result.tables {
            prop_assert!((0.0..=1.0).contains(&table.confidence));
        }
    }

    #[test]
    fn results_are_reproducible(analysis in analysis_strategy()) {
        let registry = registry();
        let engine = MappingEngine::new(&registry, MappingOptions::default());
        let first = serde_json::to_string(&engine.map(&analysis).unwrap()).unwrap();
        let second = serde_json::to_string(&engine.map(&analysis).unwrap()).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn suggestions_are_ranked_and_bounded(analysis in analysis_strategy()) {
        let registry = registry();
        let options = MappingOptions::default();
        let engine = MappingEngine::new(&registry, options.clone());
        let result = engine.map(&analysis).unwrap();
        for unmapped in &result.unmapped_fields {
            prop_assert!(unmapped.suggestions.len() <= options.max_suggestions);
            prop_assert!(unmapped.suggestions.iter().all(|s| s.similarity >= options.similarity_floor));
            prop_assert!(unmapped.suggestions.windows(2).all(|w| w[0].similarity >= w[1].similarity));
        }
    }
}
