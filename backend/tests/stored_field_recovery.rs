//! Loading state whose stored cells were damaged outside the service.

mod support;

use rstest::rstest;
use serde_json::json;
use state_backend::domain::ports::TableStore;
use state_backend::domain::tables::{Cell, Table, TableName};

use support::{Harness, full_state, load, save};

async fn damage(harness: &Harness, name: TableName, row: usize, column: usize, cell: Cell) {
    let mut table: Table = harness
        .store
        .read_table(name)
        .await
        .expect("read")
        .expect("table saved");
    table
        .rows_mut()
        .get_mut(row)
        .expect("row present")
        .set_cell(column, cell);
    harness
        .store
        .replace_table(name, &table)
        .await
        .expect("write");
}

fn column(name: TableName, column: &str) -> usize {
    name.columns()
        .iter()
        .position(|&candidate| candidate == column)
        .expect("known column")
}

fn master_row(table: &Table, key: &str) -> usize {
    table
        .rows()
        .iter()
        .position(|row| row.cell(0).as_text() == key)
        .expect("master key stored")
}

#[rstest]
#[actix_web::test]
async fn rebuilt_numeric_user_id_stays_an_integer() {
    let harness = Harness::new();
    let app = harness.app().await;
    save(&app, &full_state()).await;

    let data = column(TableName::Users, "data");
    damage(&harness, TableName::Users, 1, data, Cell::text("{broken")).await;
    let loaded = load(&app).await;

    assert_eq!(loaded["masterUsers"][1]["id"], json!(2));
    assert_eq!(loaded["masterUsers"][1]["name"], "Bo");
}

#[rstest]
#[actix_web::test]
async fn user_with_corrupt_data_is_rebuilt_from_columns() {
    let harness = Harness::new();
    let app = harness.app().await;
    save(&app, &full_state()).await;

    let data = column(TableName::Users, "data");
    damage(&harness, TableName::Users, 0, data, Cell::text("{broken")).await;
    let loaded = load(&app).await;

    let user = &loaded["masterUsers"][0];
    assert_eq!(user["id"], "u1");
    assert_eq!(user["name"], "Aki");
    assert_eq!(user["pass"], "pw");
    assert_eq!(user["role"], "admin");
    assert!(user.get("team").is_none());
    assert_eq!(loaded["masterUsers"][1]["name"], "Bo");
}

#[rstest]
#[case::garbage(Cell::text("not json"))]
#[case::null(Cell::text("null"))]
#[case::blank(Cell::Empty)]
#[actix_web::test]
async fn property_with_unusable_data_is_dropped(#[case] cell: Cell) {
    let harness = Harness::new();
    let app = harness.app().await;
    save(&app, &full_state()).await;

    let data = column(TableName::Properties, "data");
    damage(&harness, TableName::Properties, 0, data, cell).await;
    let loaded = load(&app).await;

    assert_eq!(loaded["properties"], json!([{"id": "p2", "nested": {"floor": 3}}]));
}

#[rstest]
#[case::text(Cell::text("wide"))]
#[case::blank(Cell::Empty)]
#[case::negative(Cell::Number(-2.0))]
#[actix_web::test]
async fn unreadable_zoom_falls_back_to_one(#[case] cell: Cell) {
    let harness = Harness::new();
    let app = harness.app().await;
    save(&app, &full_state()).await;

    let masters = harness
        .store
        .read_table(TableName::Masters)
        .await
        .expect("read")
        .expect("masters saved");
    let row = master_row(&masters, "zoom");
    let value = column(TableName::Masters, "value");
    damage(&harness, TableName::Masters, row, value, cell).await;
    let loaded = load(&app).await;

    assert_eq!(loaded["zoom"], json!(1.0));
    assert_eq!(loaded["masterTab"], "properties");
}

#[rstest]
#[actix_web::test]
async fn missing_masters_table_uses_defaults() {
    let harness = Harness::new();
    let app = harness.app().await;
    save(&app, &full_state()).await;

    harness
        .store
        .replace_table(TableName::Masters, &Table::with_header(TableName::Masters))
        .await
        .expect("write");
    let loaded = load(&app).await;

    assert_eq!(loaded["zoom"], json!(1.0));
    assert_eq!(loaded["masterTab"], "users");
    assert_eq!(loaded["masterL1"], json!([]));
    assert_eq!(loaded["masterUsers"][0]["id"], "u1");
}
