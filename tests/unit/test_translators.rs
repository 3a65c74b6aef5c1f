#[cfg(test)]
mod tests {
    use data_dictionary::models::{DataField, DataType, QueryValue, Relation, Value};
    use data_dictionary::query::{
        Condition, Predicate, PredicateValue, TranslateContext, TranslateError,
        TranslatedCondition, TranslatorRegistry, Translator,
    };

    fn is_manager_field() -> DataField {
        DataField::new("employee", "is_manager", DataType::Boolean)
    }

    fn salary_field() -> DataField {
        let mut field = DataField::new("title", "salary", DataType::Float);
        field.relation = Some(Relation::new("title"));
        field
    }

    fn translate(
        field: &DataField,
        operator: Option<&str>,
        value: QueryValue,
    ) -> Result<TranslatedCondition, TranslateError> {
        let translators = TranslatorRegistry::new();
        field.translate(&translators, operator, &value, &TranslateContext::default())
    }

    #[test]
    fn test_boolean_exact() {
        let translated =
            translate(&is_manager_field(), None, QueryValue::scalar(false)).unwrap();

        assert_eq!(
            translated.condition,
            Condition::Predicate(Predicate::new(
                "is_manager",
                data_dictionary::query::Lookup::Exact,
                PredicateValue::Single(Value::Bool(false)),
            ))
        );
        assert!(translated.joins.is_empty());
        assert_eq!(
            translated.language.as_deref(),
            Some("is_manager is equal to false")
        );
    }

    #[test]
    fn test_related_field_requires_join() {
        let translated =
            translate(&salary_field(), None, QueryValue::scalar(50000.0)).unwrap();

        assert_eq!(translated.joins, vec!["title".to_string()]);
        match &translated.condition {
            Condition::Predicate(predicate) => assert_eq!(predicate.path, "title.salary"),
            other => panic!("expected a predicate, got {other:?}"),
        }
    }

    #[test]
    fn test_numeric_string_coerces_like_number() {
        let from_text =
            translate(&salary_field(), None, QueryValue::scalar("50000")).unwrap();
        let from_float =
            translate(&salary_field(), None, QueryValue::scalar(50000.0)).unwrap();

        assert_eq!(from_text.condition, from_float.condition);
    }

    #[test]
    fn test_label_does_not_affect_condition() {
        let plain = translate(&salary_field(), None, QueryValue::scalar(50000.0)).unwrap();
        let labeled = translate(
            &salary_field(),
            None,
            QueryValue::labeled(QueryValue::scalar(50000.0), "High earner"),
        )
        .unwrap();

        assert_eq!(plain.condition, labeled.condition);
        assert_eq!(plain.joins, labeled.joins);
        assert_eq!(
            labeled.language.as_deref(),
            Some("salary is equal to High earner")
        );
    }

    #[test]
    fn test_nested_labels_use_outermost() {
        let value = QueryValue::labeled(
            QueryValue::labeled(QueryValue::scalar(50000.0), "inner"),
            "outer",
        );
        let plain = translate(&salary_field(), None, QueryValue::scalar(50000.0)).unwrap();
        let translated = translate(&salary_field(), None, value).unwrap();

        assert_eq!(translated.condition, plain.condition);
        assert_eq!(
            translated.language.as_deref(),
            Some("salary is equal to outer")
        );
    }

    #[test]
    fn test_null_value_on_related_field_guards_relation_key() {
        let translated = translate(&salary_field(), None, QueryValue::Null).unwrap();

        assert_eq!(
            translated.condition,
            Condition::And(vec![
                Condition::Predicate(Predicate::is_null("title.salary", true)),
                Condition::Predicate(Predicate::is_null("title.id", false)),
            ])
        );
        assert_eq!(translated.joins, vec!["title".to_string()]);
        assert_eq!(translated.language.as_deref(), Some("salary is null"));
    }

    #[test]
    fn test_negated_null_skips_relation_guard() {
        let translated =
            translate(&salary_field(), Some("-exact"), QueryValue::Null).unwrap();

        assert_eq!(
            translated.condition,
            Condition::Predicate(Predicate::is_null("title.salary", false))
        );
        assert_eq!(translated.language.as_deref(), Some("salary is not null"));
    }

    #[test]
    fn test_null_value_on_root_field_has_no_guard() {
        let translated = translate(&is_manager_field(), None, QueryValue::Null).unwrap();

        assert_eq!(
            translated.condition,
            Condition::Predicate(Predicate::is_null("is_manager", true))
        );
        assert!(translated.joins.is_empty());
    }

    #[test]
    fn test_isnull_operator_takes_boolean_flag() {
        let expecting_null = translate(
            &salary_field(),
            Some("isnull"),
            QueryValue::scalar(true),
        )
        .unwrap();
        assert_eq!(
            expecting_null.condition,
            Condition::And(vec![
                Condition::Predicate(Predicate::is_null("title.salary", true)),
                Condition::Predicate(Predicate::is_null("title.id", false)),
            ])
        );

        let expecting_value = translate(
            &salary_field(),
            Some("isnull"),
            QueryValue::scalar(false),
        )
        .unwrap();
        assert_eq!(
            expecting_value.condition,
            Condition::Predicate(Predicate::is_null("title.salary", false))
        );
    }

    #[test]
    fn test_isnull_operator_rejects_non_boolean() {
        let err = translate(
            &salary_field(),
            Some("isnull"),
            QueryValue::scalar("yes"),
        )
        .unwrap_err();
        assert!(matches!(err, TranslateError::InvalidValue { .. }));
    }

    #[test]
    fn test_in_operator_with_list() {
        let field = DataField::new("employee", "first_name", DataType::Text);
        let translated = translate(
            &field,
            Some("in"),
            QueryValue::list(["Ada", "Grace"]),
        )
        .unwrap();

        match &translated.condition {
            Condition::Predicate(predicate) => assert_eq!(
                predicate.value,
                PredicateValue::Multiple(vec![
                    Value::Text("Ada".to_string()),
                    Value::Text("Grace".to_string()),
                ])
            ),
            other => panic!("expected a predicate, got {other:?}"),
        }
        assert_eq!(
            translated.language.as_deref(),
            Some("first_name is in [Ada, Grace]")
        );
    }

    #[test]
    fn test_list_operator_rejects_scalar() {
        let err =
            translate(&salary_field(), Some("in"), QueryValue::scalar(1.0)).unwrap_err();
        assert!(matches!(err, TranslateError::InvalidValue { .. }));
    }

    #[test]
    fn test_scalar_operator_rejects_list() {
        let err = translate(
            &salary_field(),
            Some("gt"),
            QueryValue::list([1.0, 2.0]),
        )
        .unwrap_err();
        assert!(matches!(err, TranslateError::InvalidValue { .. }));
    }

    #[test]
    fn test_range_requires_exactly_two_values() {
        let err = translate(
            &salary_field(),
            Some("range"),
            QueryValue::list([1.0, 2.0, 3.0]),
        )
        .unwrap_err();
        assert!(matches!(err, TranslateError::InvalidValue { .. }));

        assert!(
            translate(
                &salary_field(),
                Some("range"),
                QueryValue::list([1.0, 2.0]),
            )
            .is_ok()
        );
    }

    #[test]
    fn test_unparseable_value_is_a_coercion_error() {
        let field = DataField::new("title", "salary", DataType::Integer);
        let err = translate(&field, None, QueryValue::scalar("abc")).unwrap_err();
        assert_eq!(
            err,
            TranslateError::Coercion {
                field: "salary".to_string(),
                value: "abc".to_string(),
                datatype: DataType::Integer,
            }
        );
    }

    #[test]
    fn test_integer_coercion_accepts_whole_floats() {
        let field = DataField::new("title", "level", DataType::Integer);
        let translated = translate(&field, None, QueryValue::scalar(3.0)).unwrap();
        match &translated.condition {
            Condition::Predicate(predicate) => {
                assert_eq!(predicate.value, PredicateValue::Single(Value::Int(3)))
            }
            other => panic!("expected a predicate, got {other:?}"),
        }

        let err = translate(&field, None, QueryValue::scalar(3.5)).unwrap_err();
        assert!(matches!(err, TranslateError::Coercion { .. }));
    }

    #[test]
    fn test_boolean_text_coercion() {
        let field = is_manager_field();
        for (raw, expected) in [("true", true), ("T", true), ("no", false), ("0", false)] {
            let translated = translate(&field, None, QueryValue::scalar(raw)).unwrap();
            match &translated.condition {
                Condition::Predicate(predicate) => assert_eq!(
                    predicate.value,
                    PredicateValue::Single(Value::Bool(expected))
                ),
                other => panic!("expected a predicate, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_unknown_operator() {
        let err =
            translate(&salary_field(), Some("approx"), QueryValue::scalar(1.0)).unwrap_err();
        assert_eq!(err, TranslateError::UnknownOperator("approx".to_string()));
    }

    #[test]
    fn test_declared_unknown_translator_is_fatal() {
        let mut field = salary_field();
        field.translator = Some("custom".to_string());

        let err = translate(&field, None, QueryValue::scalar(1.0)).unwrap_err();
        assert!(matches!(err, TranslateError::Registry(_)));
    }

    struct VacuousTranslator;

    impl Translator for VacuousTranslator {
        fn translate(
            &self,
            _field: &DataField,
            _operator: Option<&str>,
            _value: &QueryValue,
            _ctx: &TranslateContext,
        ) -> Result<TranslatedCondition, TranslateError> {
            Ok(TranslatedCondition::vacuous())
        }
    }

    #[test]
    fn test_declared_translator_is_resolved() {
        let mut translators = TranslatorRegistry::new();
        translators.register("vacuous", "Accept everything", Box::new(VacuousTranslator));

        let mut field = salary_field();
        field.translator = Some("vacuous".to_string());

        let translated = field
            .translate(
                &translators,
                None,
                &QueryValue::scalar("not a number"),
                &TranslateContext::default(),
            )
            .unwrap();
        assert!(translated.condition.is_vacuous());
    }

    #[test]
    fn test_datatype_default_routes_undeclared_fields() {
        let mut translators = TranslatorRegistry::new();
        translators.register("vacuous", "Accept everything", Box::new(VacuousTranslator));
        translators.set_datatype_default(DataType::Float, "vacuous");

        let translated = salary_field()
            .translate(
                &translators,
                None,
                &QueryValue::scalar("not a number"),
                &TranslateContext::default(),
            )
            .unwrap();
        assert!(translated.condition.is_vacuous());

        // Other datatypes still use the built-in default.
        let err = is_manager_field()
            .translate(
                &translators,
                None,
                &QueryValue::scalar("not a bool"),
                &TranslateContext::default(),
            )
            .unwrap_err();
        assert!(matches!(err, TranslateError::Coercion { .. }));
    }
}
