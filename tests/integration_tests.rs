//! Integration tests for the full generation workflow.

use sqlbind::evaluator::from_fn;
use sqlbind::property::{Introspect, PropertyDescriptor};
use sqlbind::{Bindings, DataType, IterationStatus, SqlBindError, SqlGenerator, Value};
use std::collections::HashMap;

fn map(entries: &[(&str, Value)]) -> Value {
    Value::Map(
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect::<HashMap<_, _>>(),
    )
}

fn collect_binder(
    generator: &SqlGenerator,
    template: &str,
    parameter: &Value,
    custom_variables: Option<&Bindings>,
) -> (String, Vec<(String, Value)>) {
    let mut bound = Vec::new();
    let sql = generator
        .generate_with_binder(
            template,
            parameter,
            |name, value| bound.push((name.to_string(), value)),
            custom_variables,
        )
        .expect("generate");
    bound.sort_by(|a, b| a.0.cmp(&b.0));
    (sql, bound)
}

#[derive(Debug)]
struct Person {
    id: Option<i64>,
    name: String,
}

impl Introspect for Person {
    fn properties() -> Vec<PropertyDescriptor> {
        vec![
            PropertyDescriptor::new("id", DataType::Int64)
                .with_getter(|p: &Person| Value::from(p.id)),
            PropertyDescriptor::new("name", DataType::String)
                .with_getter(|p: &Person| Value::from(p.name.as_str())),
        ]
    }
}

/// `SELECT * FROM names [WHERE id = ?]`, the clause only when `id` is not null.
fn select_by_id() -> SqlGenerator {
    SqlGenerator::new(from_fn(|_template, context, dialect| {
        let mut sql = String::from("SELECT * FROM names");
        if !context.get_variable("id")?.is_null() {
            sql.push_str(" WHERE id = ");
            sql.push_str(&dialect.param(context, "id", None)?);
        }
        Ok(sql)
    }))
}

// =============================================================================
// Scenario Tests
// =============================================================================

mod scenarios {
    use super::*;

    #[test]
    fn test_map_parameter_reference() {
        let generator = select_by_id();
        let parameter = map(&[("id", Value::Int64(5))]);

        let bound = generator.generate_bound("select.sql", &parameter, None).unwrap();

        assert_eq!(bound.sql(), "SELECT * FROM names WHERE id = #{id}");
        assert_eq!(bound.value_of("id").unwrap(), Some(Value::Int64(5)));
        assert_eq!(bound.additional_parameters().len(), 1);
        assert!(bound.has_additional_parameter("_parameter"));
    }

    #[test]
    fn test_object_parameter_with_null_property() {
        let generator = select_by_id();
        let parameter = Value::object(Person {
            id: None,
            name: "Fred".into(),
        });

        let (sql, bound) = collect_binder(&generator, "select.sql", &parameter, None);

        assert_eq!(sql, "SELECT * FROM names");
        assert!(bound.is_empty());
    }

    #[test]
    fn test_object_parameter_with_present_property() {
        let generator = select_by_id();
        let parameter = Value::object(Person {
            id: Some(7),
            name: "Fred".into(),
        });

        let bound = generator.generate_bound("select.sql", &parameter, None).unwrap();

        assert_eq!(bound.sql(), "SELECT * FROM names WHERE id = #{id}");
        assert_eq!(bound.value_of("id").unwrap(), Some(Value::Int64(7)));
        assert_eq!(bound.value_of("name").unwrap(), Some(Value::from("Fred")));
        assert_eq!(bound.value_of("missing").unwrap(), None);
    }

    #[test]
    fn test_iterated_list_produces_distinct_variables() {
        let generator = SqlGenerator::new(from_fn(|_template, context, dialect| {
            let names = context.get_variable("names")?;
            let items = names.as_list().unwrap_or_default().to_vec();
            let mut placeholders = Vec::new();
            for step in IterationStatus::sequence(&items) {
                placeholders.push(dialect.param(context, "names", Some(&step))?);
            }
            Ok(format!(
                "SELECT * FROM names WHERE name IN ({})",
                placeholders.join(", ")
            ))
        }));
        let parameter = map(&[(
            "names",
            Value::List(vec!["Alice".into(), "Bob".into(), "Carol".into()]),
        )]);

        let (sql, bound) = collect_binder(&generator, "in.sql", &parameter, None);

        assert_eq!(
            sql,
            "SELECT * FROM names WHERE name IN (#{names_0_0}, #{names_0_1}, #{names_0_2})"
        );
        assert_eq!(
            bound,
            vec![
                ("names_0_0".to_string(), Value::from("Alice")),
                ("names_0_1".to_string(), Value::from("Bob")),
                ("names_0_2".to_string(), Value::from("Carol")),
            ]
        );
    }

    #[derive(Debug)]
    struct Faulty;

    impl Introspect for Faulty {
        fn properties() -> Vec<PropertyDescriptor> {
            vec![PropertyDescriptor::new("id", DataType::Int64)
                .with_reader(|_: &Faulty| Err("connection reset".into()))]
        }
    }

    #[test]
    fn test_failing_reader_aborts_generation() {
        let generator = select_by_id();
        let mut called = false;

        let result = generator.generate_with_binder(
            "select.sql",
            &Value::object(Faulty),
            |_, _| called = true,
            None,
        );

        match result {
            Err(SqlBindError::PropertyInvocation {
                property,
                type_name,
                source,
            }) => {
                assert_eq!(property, "id");
                assert!(type_name.contains("Faulty"));
                assert_eq!(source.to_string(), "connection reset");
            }
            other => panic!("expected PropertyInvocation, got {other:?}"),
        }
        assert!(!called);
    }

    #[test]
    fn test_nested_loops_sharing_base_name() {
        let generator = SqlGenerator::new(from_fn(|_template, context, dialect| {
            let rows = context.get_variable("rows")?;
            let rows = rows.as_list().unwrap_or_default().to_vec();
            let mut groups = Vec::new();
            for outer in IterationStatus::sequence(&rows) {
                let mut group = vec![dialect.param(context, "row.label", Some(&outer))?];
                let cells = outer
                    .current()
                    .as_map()
                    .and_then(|m| m.get("cells"))
                    .and_then(Value::as_list)
                    .unwrap_or_default()
                    .to_vec();
                for inner in IterationStatus::sequence(&cells) {
                    group.push(dialect.param(context, "row", Some(&inner))?);
                }
                groups.push(format!("({})", group.join(", ")));
            }
            Ok(format!("INSERT INTO grid VALUES {}", groups.join(", ")))
        }));
        let parameter = map(&[(
            "rows",
            Value::List(vec![
                map(&[
                    ("label", "a".into()),
                    ("cells", Value::List(vec![Value::Int64(1), Value::Int64(2)])),
                ]),
                map(&[
                    ("label", "b".into()),
                    ("cells", Value::List(vec![Value::Int64(3), Value::Int64(4)])),
                ]),
            ]),
        )]);

        let (sql, bound) = collect_binder(&generator, "grid.sql", &parameter, None);

        assert_eq!(
            sql,
            "INSERT INTO grid VALUES \
             (#{row_0_0.label}, #{row_1_0}, #{row_1_1}), \
             (#{row_0_1.label}, #{row_2_0}, #{row_2_1})"
        );
        let names: Vec<&str> = bound.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(
            names,
            vec!["row_0_0", "row_0_1", "row_1_0", "row_1_1", "row_2_0", "row_2_1"]
        );
        assert_eq!(bound[5].1, Value::Int64(4));
    }
}

// =============================================================================
// Variable Resolution Tests
// =============================================================================

mod resolution {
    use super::*;

    #[test]
    fn test_custom_bind_variable_wins_over_parameter() {
        let generator = SqlGenerator::new(from_fn(|_template, context, dialect| {
            let before = context.get_variable("id")?;
            dialect.bind(context, &Value::from("id"), Value::Int64(99))?;
            let after = context.get_variable("id")?;
            Ok(format!("{before} -> {after}"))
        }));

        let sql = generator
            .generate("t", &map(&[("id", Value::Int64(5))]))
            .unwrap();

        assert_eq!(sql, "5 -> 99");
    }

    #[test]
    fn test_call_variables_win_over_defaults() {
        let mut defaults = Bindings::new();
        defaults.insert("table".into(), "names".into());
        defaults.insert("schema".into(), "public".into());
        let generator = SqlGenerator::new(from_fn(|_template, context, _dialect| {
            Ok(format!(
                "SELECT * FROM {}.{}",
                context.get_variable("schema")?,
                context.get_variable("table")?
            ))
        }))
        .with_default_custom_variables(defaults);

        let mut custom = Bindings::new();
        custom.insert("table".into(), "archived_names".into());

        assert_eq!(
            generator.generate("t", &Value::Null).unwrap(),
            "SELECT * FROM public.names"
        );
        assert_eq!(
            generator
                .generate_with_variables("t", &Value::Null, &custom)
                .unwrap(),
            "SELECT * FROM public.archived_names"
        );
        assert_eq!(generator.default_custom_variables().len(), 2);
    }

    #[test]
    fn test_bound_sql_sees_call_variables() {
        let generator = SqlGenerator::new(from_fn(|_template, context, dialect| {
            Ok(format!(
                "SELECT * FROM {} WHERE id = {}",
                context.get_variable("table")?,
                dialect.param(context, "id", None)?
            ))
        }));
        let mut custom = Bindings::new();
        custom.insert("table".into(), "archived_names".into());
        let parameter = map(&[("id", Value::Int64(3))]);

        let bound = generator
            .generate_bound("t", &parameter, Some(&custom))
            .unwrap();

        assert_eq!(bound.sql(), "SELECT * FROM archived_names WHERE id = #{id}");
        assert_eq!(bound.value_of("id").unwrap(), Some(Value::Int64(3)));
        assert!(generator.generate_bound("t", &parameter, None).is_err());
    }

    #[test]
    fn test_defaults_win_over_parameter() {
        let mut defaults = Bindings::new();
        defaults.insert("id".into(), Value::Int64(1));
        let generator = SqlGenerator::new(from_fn(|_template, context, _dialect| {
            Ok(context.get_variable("id")?.to_string())
        }))
        .with_default_custom_variables(defaults);

        assert_eq!(
            generator
                .generate("t", &map(&[("id", Value::Int64(2))]))
                .unwrap(),
            "1"
        );
    }

    #[test]
    fn test_scalar_parameter_falls_back() {
        let generator = select_by_id();

        let bound = generator.generate_bound("select.sql", &Value::Int64(6), None).unwrap();

        assert_eq!(bound.sql(), "SELECT * FROM names WHERE id = #{id}");
        assert_eq!(bound.value_of("id").unwrap(), Some(Value::Int64(6)));
    }

    #[derive(Debug)]
    struct Marker;

    impl Introspect for Marker {
        fn properties() -> Vec<PropertyDescriptor> {
            Vec::new()
        }
    }

    #[test]
    fn test_property_less_object_falls_back() {
        let generator = SqlGenerator::new(from_fn(|_template, context, _dialect| {
            Ok(context.get_variable("anything")?.type_name())
        }));

        let sql = generator.generate("t", &Value::object(Marker)).unwrap();

        assert!(sql.contains("Marker"));
    }

    #[test]
    fn test_null_parameter_does_not_fall_back() {
        let generator = select_by_id();

        let err = generator.generate("select.sql", &Value::Null).unwrap_err();

        assert!(matches!(err, SqlBindError::UnresolvableReference(name) if name == "id"));
    }

    #[test]
    fn test_map_missing_key_is_unresolvable() {
        let generator = select_by_id();

        let err = generator
            .generate("select.sql", &map(&[("name", "x".into())]))
            .unwrap_err();

        assert!(matches!(err, SqlBindError::UnresolvableReference(_)));
    }

    #[test]
    fn test_parameter_object_key() {
        let generator = SqlGenerator::new(from_fn(|_template, context, _dialect| {
            Ok(context.get_variable("_parameter")?.to_string())
        }));

        assert_eq!(generator.generate("t", &Value::from("Be%")).unwrap(), "Be%");
        assert_eq!(generator.generate("t", &Value::Null).unwrap(), "null");
    }
}

// =============================================================================
// Custom Bind Variable Tests
// =============================================================================

mod custom_bind_variables {
    use super::*;

    /// Binds an escaped LIKE pattern, the typical use of the bind directive.
    fn like_generator() -> SqlGenerator {
        SqlGenerator::new(from_fn(|_template, context, dialect| {
            let name = context.get_variable("name")?.to_string();
            let escaped = name.replace('%', "\\%");
            dialect.bind(context, &Value::from("patternName"), format!("{escaped}%").into())?;
            dialect.bind(context, &Value::from("limit"), Value::Int64(10))?;
            dialect.bind(context, &Value::from("limit"), Value::Int64(20))?;
            Ok(format!(
                "SELECT * FROM names WHERE name LIKE {} LIMIT {}",
                dialect.param(context, "patternName", None)?,
                dialect.param(context, "limit", None)?
            ))
        }))
    }

    #[test]
    fn test_each_variable_reported_once() {
        let generator = like_generator();

        let (sql, bound) = collect_binder(
            &generator,
            "like.sql",
            &map(&[("name", "Be%".into())]),
            None,
        );

        assert_eq!(
            sql,
            "SELECT * FROM names WHERE name LIKE #{patternName} LIMIT #{limit}"
        );
        assert_eq!(
            bound,
            vec![
                ("limit".to_string(), Value::Int64(20)),
                ("patternName".to_string(), Value::from("Be\\%%")),
            ]
        );
    }

    #[test]
    fn test_bound_sql_carries_custom_variables() {
        let generator = like_generator();
        let parameter = map(&[("name", "Be".into())]);

        let bound = generator.generate_bound("like.sql", &parameter, None).unwrap();

        assert_eq!(bound.additional_parameters().len(), 3);
        assert_eq!(bound.value_of("patternName").unwrap(), Some(Value::from("Be%")));
        assert_eq!(bound.value_of("name").unwrap(), Some(Value::from("Be")));
        assert_eq!(bound.parameter(), &parameter);
    }

    #[test]
    fn test_variables_do_not_leak_between_calls() {
        let generator = SqlGenerator::new(from_fn(|_template, context, dialect| {
            let seen = context.contains_variable("counter");
            dialect.bind(context, &Value::from("counter"), Value::Int64(1))?;
            Ok(seen.to_string())
        }));

        assert_eq!(generator.generate("t", &Value::Null).unwrap(), "false");
        assert_eq!(generator.generate("t", &Value::Null).unwrap(), "false");
    }

    #[test]
    fn test_empty_variable_name_rejected() {
        let generator = SqlGenerator::new(from_fn(|_template, context, dialect| {
            dialect.bind(context, &Value::Null, Value::Int64(1))?;
            Ok(String::new())
        }));

        let err = generator.generate("t", &Value::Null).unwrap_err();

        assert!(matches!(err, SqlBindError::VariableNameInvalid(_)));
    }

    #[test]
    fn test_reserved_variable_name_rejected() {
        let generator = SqlGenerator::new(from_fn(|_template, context, dialect| {
            dialect.bind(context, &Value::from("_parameter"), Value::Int64(99))?;
            Ok(context.get_variable("_parameter")?.to_string())
        }));
        let mut reported = Vec::new();

        let result = generator.generate_with_binder(
            "t",
            &Value::Int64(1),
            |name, _| reported.push(name.to_string()),
            None,
        );

        assert!(matches!(result, Err(SqlBindError::VariableNameInvalid(name)) if name == "_parameter"));
        assert!(reported.is_empty());
    }

    #[test]
    fn test_evaluator_failure_reports_nothing() {
        let generator = SqlGenerator::new(from_fn(|_template, context, dialect| {
            dialect.bind(context, &Value::from("x"), Value::Int64(1))?;
            Err(SqlBindError::Template("unclosed directive".into()))
        }));
        let mut reported = Vec::new();

        let result = generator.generate_with_binder(
            "t",
            &Value::Null,
            |name, _| reported.push(name.to_string()),
            None,
        );

        assert!(matches!(result, Err(SqlBindError::Template(_))));
        assert!(reported.is_empty());
    }
}

// =============================================================================
// Configuration Tests
// =============================================================================

mod configuration {
    use super::*;
    use sqlbind::evaluator::Verbatim;
    use sqlbind::property::{
        Bean, BeanType, DescriptorCache, PropertyAccessor, StandardPropertyAccessor,
    };
    use sqlbind::GeneratorConfig;
    use std::sync::Arc;

    #[test]
    fn test_config_selects_renderer_and_defaults() {
        let config = GeneratorConfig::from_json(
            r#"{
                "bind-variable-render": "SPRING_NAMED_PARAMETER",
                "default-custom-variables": {"tableName": "names"},
                "locale": "ja-JP"
            }"#,
        )
        .unwrap();
        let generator = SqlGenerator::with_config(
            from_fn(|_template, context, dialect| {
                Ok(format!(
                    "SELECT * FROM {} WHERE id = {} -- {}",
                    context.get_variable("tableName")?,
                    dialect.param(context, "id", None)?,
                    context.locale()
                ))
            }),
            config,
        );

        assert_eq!(
            generator
                .generate("t", &map(&[("id", Value::Int64(1))]))
                .unwrap(),
            "SELECT * FROM names WHERE id = :id -- ja-JP"
        );
    }

    #[test]
    fn test_custom_renderer() {
        let generator = select_by_id()
            .with_bind_variable_renderer(Arc::new(|name: &str| format!("${{{name}}}")));

        assert_eq!(
            generator.generate("t", &Value::Int64(3)).unwrap(),
            "SELECT * FROM names WHERE id = ${id}"
        );
        assert_eq!(generator.dialect().render("x"), "${x}");
    }

    #[test]
    fn test_verbatim_evaluator() {
        let generator = SqlGenerator::new(Verbatim);

        assert_eq!(
            generator.generate("SELECT 1", &Value::Null).unwrap(),
            "SELECT 1"
        );
    }

    /// Exposes every object as a single `id` property of 42.
    struct ConstantAccessor;

    impl PropertyAccessor for ConstantAccessor {
        fn property_names(&self, _bean_type: BeanType) -> Vec<String> {
            vec!["id".to_string()]
        }

        fn property_type(&self, _bean_type: BeanType, _name: &str) -> sqlbind::Result<DataType> {
            Ok(DataType::Int64)
        }

        fn get_value(&self, _target: &dyn Bean, _name: &str) -> sqlbind::Result<Value> {
            Ok(Value::Int64(42))
        }

        fn set_value(&self, _target: &mut dyn Bean, name: &str, _value: Value) -> sqlbind::Result<()> {
            Err(SqlBindError::property_not_found(name, "constant"))
        }
    }

    #[test]
    fn test_custom_property_accessor() {
        let generator = SqlGenerator::new(from_fn(|_template, context, _dialect| {
            Ok(context.get_variable("id")?.to_string())
        }))
        .with_property_accessor(Arc::new(ConstantAccessor));
        let parameter = Value::object(Person {
            id: Some(1),
            name: "x".into(),
        });

        assert_eq!(generator.generate("t", &parameter).unwrap(), "42");
    }

    #[test]
    fn test_concurrent_generation_shares_cache() {
        let cache = DescriptorCache::shared();
        let generator = select_by_id()
            .with_property_accessor(Arc::new(StandardPropertyAccessor::new(Arc::clone(&cache))));

        std::thread::scope(|scope| {
            for thread in 0..8_i64 {
                let generator = &generator;
                scope.spawn(move || {
                    for i in 0..25_i64 {
                        let parameter = Value::object(Person {
                            id: Some(thread * 100 + i),
                            name: "n".into(),
                        });
                        let bound = generator.generate_bound("select.sql", &parameter, None).unwrap();
                        assert_eq!(
                            bound.value_of("id").unwrap(),
                            Some(Value::Int64(thread * 100 + i))
                        );
                    }
                });
            }
        });

        assert_eq!(cache.len(), 1);
        assert!(cache.misses() >= 1);
        assert!(cache.hits() > 0);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.hits(), 0);
    }
}
