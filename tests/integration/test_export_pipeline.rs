#[cfg(test)]
mod tests {
    use data_dictionary::config::Settings;
    use data_dictionary::export::{CsvExporter, Exporter, JsonExporter, ManualReadOptions, Row};
    use data_dictionary::formatters::default_registry;
    use data_dictionary::models::{
        Concept, DataField, DataType, FieldCatalog, OutputFormat, Relation, Value,
    };
    use data_dictionary::query::{
        Condition, TranslateContext, TranslatorRegistry, translate_tree,
    };
    use serde_json::json;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .try_init();
    }

    fn catalog() -> FieldCatalog {
        let mut catalog = FieldCatalog::new();
        catalog.push(DataField::new("employee", "first_name", DataType::Text));
        catalog.push(DataField::new("employee", "is_manager", DataType::Boolean));
        let mut salary = DataField::new("title", "salary", DataType::Float);
        salary.relation = Some(Relation::new("title"));
        catalog.push(salary);
        catalog
    }

    fn concepts() -> Vec<Concept> {
        let mut demographics = Concept::new("Demographics", "concept");
        demographics.add_field(
            DataField::new("employee", "first_name", DataType::Text),
            1.0,
        );
        demographics.add_field(
            DataField::new("employee", "is_manager", DataType::Boolean),
            2.0,
        );

        let mut compensation = Concept::new("Compensation", "concept");
        compensation.add_field(DataField::new("title", "salary", DataType::Float), 1.0);

        vec![demographics, compensation]
    }

    fn rows() -> Vec<Row> {
        vec![
            vec![
                Value::Text("Ada".to_string()),
                Value::Bool(true),
                Value::Float(90000.0),
            ],
            vec![
                Value::Text("Grace".to_string()),
                Value::Bool(false),
                Value::Null,
            ],
        ]
    }

    #[test]
    fn test_condition_translation_through_export() {
        init_tracing();

        // A caller filters on the salary concept, then exports matching
        // rows. The condition side and the export side share the same
        // field metadata.
        let translated = translate_tree(
            &json!({
                "type": "and",
                "children": [
                    {"field": "is_manager", "value": true},
                    {"field": "title.salary", "operator": "gte", "value": "50000"},
                ],
            }),
            &catalog(),
            &TranslatorRegistry::new(),
            &TranslateContext::for_model("employee"),
        )
        .unwrap();

        assert_eq!(translated.joins, vec!["title".to_string()]);
        assert!(matches!(translated.condition, Condition::And(_)));
        assert_eq!(
            translated.language.as_deref(),
            Some("is_manager is equal to true and salary is greater than or equal to 50000")
        );

        let exporter = Exporter::new(
            &concepts(),
            &default_registry(),
            &[OutputFormat::Machine],
        )
        .unwrap();
        let formatted: Vec<Row> = exporter
            .read(rows(), None)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(formatted.len(), 2);
    }

    #[test]
    fn test_csv_output() {
        init_tracing();

        let exporter = Exporter::new(
            &concepts(),
            &default_registry(),
            &[OutputFormat::Human],
        )
        .unwrap();

        let mut buffer: Vec<u8> = Vec::new();
        let count = CsvExporter::write(&exporter, rows(), None, &mut buffer).unwrap();
        assert_eq!(count, 2);

        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "first_name,is_manager,salary");
        assert_eq!(lines[1], "Ada,Yes,90000");
        // Human format renders the null salary as empty text.
        assert_eq!(lines[2], "Grace,No,");
    }

    #[test]
    fn test_csv_quotes_delimiters() {
        let exporter = Exporter::new(
            &concepts(),
            &default_registry(),
            &[OutputFormat::Machine],
        )
        .unwrap();

        let rows = vec![vec![
            Value::Text("Lovelace, Ada".to_string()),
            Value::Bool(true),
            Value::Float(90000.0),
        ]];
        let mut buffer: Vec<u8> = Vec::new();
        CsvExporter::write(&exporter, rows, None, &mut buffer).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("\"Lovelace, Ada\""));
    }

    #[test]
    fn test_csv_file_write() {
        init_tracing();

        let exporter = Exporter::new(
            &concepts(),
            &default_registry(),
            &[OutputFormat::Machine],
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.csv");
        let count = CsvExporter::write_file(&exporter, rows(), None, &path).unwrap();
        assert_eq!(count, 2);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("first_name,is_manager,salary"));
        assert_eq!(contents.lines().count(), 3);
    }

    #[test]
    fn test_json_output() {
        let exporter = Exporter::new(
            &concepts(),
            &default_registry(),
            &[OutputFormat::Machine],
        )
        .unwrap();

        let objects = JsonExporter::to_objects(&exporter, rows(), None).unwrap();
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0]["first_name"], json!("Ada"));
        assert_eq!(objects[0]["is_manager"], json!(true));
        assert_eq!(objects[0]["salary"], json!(90000.0));
        assert_eq!(objects[1]["salary"], json!(null));
    }

    #[test]
    fn test_json_file_write() {
        let exporter = Exporter::new(
            &concepts(),
            &default_registry(),
            &[OutputFormat::Machine],
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        JsonExporter::write_file(&exporter, rows(), None, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_settings_drive_pooled_export() {
        init_tracing();

        let settings = Settings::default();
        let exporter = Exporter::new(
            &concepts(),
            &default_registry(),
            &settings.preferred_formats,
        )
        .unwrap();

        let input: Vec<Row> = (0..20)
            .map(|i| {
                vec![
                    Value::Text(format!("employee-{i}")),
                    Value::Bool(i % 2 == 0),
                    Value::Float(50000.0 + i as f64),
                ]
            })
            .collect();

        let formatted: Vec<Row> = exporter
            .threaded_read(input.clone(), settings.export_threads, None)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(formatted, input);
    }

    #[test]
    fn test_paged_distinct_export() {
        let exporter = Exporter::new(
            &concepts(),
            &default_registry(),
            &[OutputFormat::Machine],
        )
        .unwrap();

        // Backend rows carry a trailing sort key that must not appear in
        // the output.
        let mut input = rows();
        for (i, row) in input.iter_mut().enumerate() {
            row.push(Value::Int(i as i64));
        }
        input.push(input[0].clone());

        let options = ManualReadOptions {
            force_distinct: true,
            offset: None,
            limit: None,
        };
        let formatted: Vec<Row> = exporter
            .manual_read(input, options, None)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(formatted.len(), 2);
        assert!(formatted.iter().all(|row| row.len() == 3));
    }
}
