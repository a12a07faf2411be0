//! Integration tests for spendcat-core
//!
//! These tests exercise the full load → categorize → report/export workflow.

use spendcat_core::{
    classifier::{self, TextClassifier},
    export::export_csv_string,
    import::{load_csv, parse_csv},
    report::{filter_month, summarize, MonthFilter},
    suggest::suggest,
    CategorySource, Error, Pipeline, RuleSet, OTHERS,
};

/// Three rows: one food expense, one salary credit, one shopping expense
fn statement_csv() -> &'static str {
    r#"Date,Description,Amount
2024-01-05,Zomato Order #123,-450
2024-01-10,Salary Credit,50000
2024-02-01,Amazon Purchase,-1200"#
}

/// Statement with rows the default rules don't know
fn mixed_statement_csv() -> &'static str {
    r#" DATE , Description , AMOUNT ,Reference
03/02/2024,SWIGGY INSTAMART 99,-320.50,R1
03/05/2024,Rapido Bike Taxi,-85,R2
03/09/2024,Metro Card Topup,-500,R3
03/11/2024,Interest Credit,12.10,R4
04/01/2024,Electricity Bill APR,-1500,R5"#
}

// =============================================================================
// Rule-based Workflow
// =============================================================================

#[test]
fn test_end_to_end_default_rules() {
    let table = parse_csv(statement_csv().as_bytes()).expect("Failed to parse CSV");
    assert_eq!(table.len(), 3);

    let rules = RuleSet::embedded().expect("Embedded rules should load");
    let output = Pipeline::new(rules).run(table).expect("Pipeline failed");

    assert_eq!(output.records.len(), 2);
    assert_eq!(output.records[0].clean_description(), "zomato order");
    assert_eq!(output.records[0].category, "Food");
    assert_eq!(output.records[0].amount(), 450.0);
    assert_eq!(output.records[1].category, "Shopping");
    assert_eq!(output.records[1].amount(), 1200.0);
    assert_eq!(output.stats.credits_dropped, 1);

    let summary = summarize(&output.records);
    assert_eq!(summary.total_spend, 1650.0);
    assert_eq!(summary.category_count, 2);
    assert_eq!(summary.transaction_count, 2);
}

#[test]
fn test_export_round_trips_through_loader() {
    let table = parse_csv(mixed_statement_csv().as_bytes()).unwrap();
    let extra = table.extra_columns.clone();
    assert_eq!(extra, vec!["reference".to_string()]);

    let output = Pipeline::new(RuleSet::embedded().unwrap())
        .run(table)
        .unwrap();
    let csv = export_csv_string(&extra, &output.records).unwrap();

    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("date,description,amount,reference,clean_description,category")
    );
    assert_eq!(
        lines.next(),
        Some("2024-03-02,SWIGGY INSTAMART 99,320.50,R1,swiggy instamart,Food")
    );

    // Exported amounts are positive, so nothing is dropped a second time
    let reloaded = parse_csv(csv.as_bytes()).unwrap();
    assert_eq!(reloaded.len(), output.records.len());
}

#[test]
fn test_month_report() {
    let table = parse_csv(mixed_statement_csv().as_bytes()).unwrap();
    let output = Pipeline::new(RuleSet::embedded().unwrap())
        .run(table)
        .unwrap();

    let march: MonthFilter = "2024-03".parse().unwrap();
    let selected = filter_month(&output.records, &march);
    let summary = summarize(selected.iter().copied());
    assert_eq!(summary.transaction_count, 3);
    assert_eq!(summary.total_spend, 905.5);
    assert_eq!(summary.categories[0].category, "Transport");

    let april: MonthFilter = "2024-04".parse().unwrap();
    let summary = summarize(filter_month(&output.records, &april).iter().copied());
    assert_eq!(summary.categories[0].category, "Bills");
}

// =============================================================================
// Classifier Workflow
// =============================================================================

#[test]
fn test_model_fallback_and_suggestions() {
    let model = classifier::fit(
        &["rapido bike", "ola auto", "zomato order", "amazon buy"],
        &["Transport", "Transport", "Food", "Shopping"],
    )
    .unwrap();

    // Rules alone leave the bike taxi unmatched; the model can suggest a label
    let rules_only = Pipeline::new(RuleSet::embedded().unwrap())
        .run(parse_csv(mixed_statement_csv().as_bytes()).unwrap())
        .unwrap();
    let suggestions = suggest(&rules_only.records, &model).unwrap();
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].record.category, OTHERS);
    assert_eq!(suggestions[0].suggested, "Transport");

    let with_model = Pipeline::new(RuleSet::embedded().unwrap())
        .with_fallback(model)
        .run(parse_csv(mixed_statement_csv().as_bytes()).unwrap())
        .unwrap();
    let rapido = &with_model.records[1];
    assert_eq!(rapido.category, "Transport");
    assert_eq!(rapido.source, Some(CategorySource::Model));
    assert_eq!(with_model.stats.fallback_to_others, 0);
}

#[test]
fn test_saved_model_reloads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");

    let model = classifier::fit(&["zomato order", "amazon buy"], &["Food", "Shopping"]).unwrap();
    model.save(&path).unwrap();

    let loaded = TextClassifier::load(&path).unwrap();
    assert_eq!(loaded.to_json().unwrap(), model.to_json().unwrap());
    assert_eq!(loaded.predict_one("zomato again").unwrap(), "Food");
}

// =============================================================================
// Error Paths
// =============================================================================

#[test]
fn test_load_csv_missing_column() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    std::fs::write(&path, "date,amount\n2024-01-01,-5\n").unwrap();

    match load_csv(&path) {
        Err(Error::Schema { column, .. }) => assert_eq!(column, "description"),
        other => panic!("Expected schema error, got {:?}", other),
    }
}

#[test]
fn test_all_credits_yields_empty_success() {
    let csv = "date,description,amount\n2024-01-01,Refund,10\n2024-01-02,Salary,100\n";
    let output = Pipeline::new(RuleSet::embedded().unwrap())
        .run(parse_csv(csv.as_bytes()).unwrap())
        .unwrap();
    assert!(output.records.is_empty());
    assert_eq!(summarize(&output.records).total_spend, 0.0);
}
