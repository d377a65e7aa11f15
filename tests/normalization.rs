use autorank::analyzer::compare_sources;
use autorank::parser::{
    parser_for, CpcaWideParser, GasgooModelParser, GasgooRankParser, TableParser,
};
use autorank::{
    assemble, assemble_models, assemble_wide, load_mapping, match_manufacturer, normalize_volume,
    resolve_period_column, CanonicalDataset, CellValue, ManufacturerMapping, Period, Provider,
    ProviderConfig, RawTable, Source,
};
use std::path::PathBuf;

fn fixture_mapping() -> ManufacturerMapping {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/manufacturers.json");
    load_mapping(&path).unwrap_or_else(|err| panic!("failed to load {}: {}", path.display(), err))
}

fn table(json: &str) -> RawTable {
    serde_json::from_str(json).expect("fixture table should decode")
}

fn period(s: &str) -> Period {
    s.parse().unwrap()
}

#[test]
fn gasgoo_manufacturer_ranking() {
    let t = table(r#"{"columns": ["厂商", "2025-1"], "data": [["比亚迪汽车", "300000"]]}"#);
    let gasgoo = Provider::GasgooManufacturers.into();
    let records: Vec<_> = assemble(&t, "厂商", period("202501"), gasgoo, 1).unwrap().collect();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].entity(), "比亚迪汽车");
    assert_eq!(records[0].period().canonical(), "202501");
    assert_eq!(records[0].volume(), 300000);
}

#[test]
fn cpca_wide_table_scales_ten_thousands() {
    let t = table(r#"{"columns": ["厂商", "2025年1月"], "data": [["比亚迪汽车", 41.4784]]}"#);
    assert_eq!(resolve_period_column(&t.columns, period("202501"), 1), Some("2025年1月"));
    assert_eq!(
        normalize_volume(&CellValue::Number(41.4784), 10_000).map(|v| v.get()),
        Some(414784)
    );
    let records: Vec<_> =
        assemble_wide(&t, "厂商", Provider::CpcaWide.into(), 10_000).unwrap().collect();
    assert_eq!(records[0].volume(), 414784);
}

#[test]
fn model_names_resolve_through_fixture_mapping() {
    let mapping = fixture_mapping();
    assert_eq!(match_manufacturer("比亚迪海鸥", &mapping), Some("比亚迪汽车"));
    assert_eq!(match_manufacturer("问界M9", &mapping), Some("赛力斯汽车"));
    assert_eq!(match_manufacturer("model y", &mapping), Some("特斯拉中国"));
    assert_eq!(match_manufacturer("未知车型X", &mapping), None);
}

#[test]
fn model_ranking_drops_untracked_and_empty_cells() {
    let mapping = fixture_mapping();
    let t = table(
        r#"{"columns": ["车型", "2025-1", "1月同比"], "data": [
            ["比亚迪海鸥", 40000, "10%"],
            ["未知车型X", 500, "1%"],
            ["吉利星愿", null, "-"],
            ["宏光MINIEV", "NaN", "-"],
            ["Model Y", "32,000", "-5%"]
        ]}"#,
    );
    let source = Provider::GasgooModels.into();
    let records: Vec<_> = assemble_models(&t, "车型", period("202501"), &mapping, source, 1)
        .unwrap()
        .collect();
    let got: Vec<(&str, Option<&str>, u64)> = records
        .iter()
        .map(|r| (r.entity(), r.model_name(), r.volume()))
        .collect();
    assert_eq!(
        got,
        vec![
            ("比亚迪汽车", Some("比亚迪海鸥"), 40000),
            ("特斯拉中国", Some("Model Y"), 32000),
        ]
    );
}

#[test]
fn synthetic_triples_survive_assembly() {
    let known = [("A", 10.0), ("B", 0.0), ("C", 7.0), ("D", -1.0), ("E", 1.0)];
    let rows = known
        .iter()
        .map(|(name, v)| vec![CellValue::from(*name), CellValue::from(*v)])
        .collect();
    let t = RawTable::new(vec!["厂商".into(), "2024年6月".into()], rows);

    let gasgoo = Provider::GasgooManufacturers.into();
    let records: Vec<_> = assemble(&t, "厂商", period("202406"), gasgoo, 1).unwrap().collect();
    let got: Vec<(String, String, u64)> = records
        .iter()
        .map(|r| (r.entity().to_string(), r.period().to_string(), r.volume()))
        .collect();
    let expected: Vec<(String, String, u64)> = known
        .iter()
        .filter(|(_, v)| *v > 0.0)
        .map(|(name, v)| (name.to_string(), "202406".to_string(), *v as u64))
        .collect();
    assert_eq!(got, expected);
}

#[test]
fn dataset_keeps_overlapping_provider_reports_and_serializes() {
    let mapping = fixture_mapping();
    let gasgoo = table(
        r#"{"columns": ["厂商", "2025-12"], "data": [["比亚迪汽车", 500000], ["吉利汽车", 230000]]}"#,
    );
    let models = table(r#"{"columns": ["车型", "2025-12"], "data": [["秦PLUS", 40000]]}"#);
    let cpca = table(
        r#"{"columns": ["厂商", "2025年11月", "2025年12月"], "data": [["比亚迪汽车", 48.0, 51.0]]}"#,
    );

    let dec = Some(period("202512"));
    let mut dataset = CanonicalDataset::new();
    dataset.extend(GasgooRankParser::new(1).parse(&gasgoo, dec).unwrap());
    dataset.extend(GasgooModelParser::new(&mapping, 1).parse(&models, dec).unwrap());
    dataset.extend(CpcaWideParser::new(10_000).parse(&cpca, None).unwrap());
    assert_eq!(dataset.len(), 5);

    let json = serde_json::to_value(&dataset).unwrap();
    assert_eq!(
        json[0],
        serde_json::json!({"name": "比亚迪汽车", "volume": 500000, "date": "202512", "source": "GASGOO"})
    );
    assert_eq!(json[2]["model_name"], "秦PLUS");
    assert_eq!(json[3]["date"], "202511");

    let report = compare_sources(&dataset, period("202512"), &["比亚迪汽车".to_string()]);
    let names: Vec<&str> = report.sources.iter().map(Source::name).collect();
    assert_eq!(names, vec!["GASGOO", "GASGOO_MODELS", "CPCA"]);
    let volumes: Vec<Option<u64>> = report.rows[0].volumes.iter().map(|v| v.volume).collect();
    assert_eq!(volumes, vec![Some(500000), Some(40000), Some(510000)]);
    assert_eq!(report.rows[0].spread, Some(470000));
}

#[test]
fn wholesale_and_retail_feeds_compare_side_by_side() {
    let mapping = ManufacturerMapping::default();
    let feed = |name: &str| ProviderConfig {
        kind: Provider::CpcaWide,
        url: format!("http://localhost/{}", name),
        unit_scale: None,
        name: Some(name.to_string()),
    };
    let wholesale = table(r#"{"columns": ["厂商", "2025年1月"], "data": [["比亚迪汽车", 51.0]]}"#);
    let retail = table(r#"{"columns": ["厂商", "2025年1月"], "data": [["比亚迪汽车", 48.0]]}"#);

    let mut dataset = CanonicalDataset::new();
    let parser = parser_for(&feed("CPCA_WHOLESALE"), &mapping);
    dataset.extend(parser.parse(&wholesale, None).unwrap());
    let parser = parser_for(&feed("CPCA_RETAIL"), &mapping);
    dataset.extend(parser.parse(&retail, None).unwrap());

    let report = compare_sources(&dataset, period("202501"), &[]);
    let names: Vec<&str> = report.sources.iter().map(Source::name).collect();
    assert_eq!(names, vec!["CPCA_WHOLESALE", "CPCA_RETAIL"]);
    let volumes: Vec<Option<u64>> = report.rows[0].volumes.iter().map(|v| v.volume).collect();
    assert_eq!(volumes, vec![Some(510000), Some(480000)]);
    assert_eq!(report.rows[0].spread, Some(30000));
}
