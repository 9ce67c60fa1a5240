//! End-to-end flow: raw parameters in, compiled query fragment out.

use serde_json::json;

use searchable::{
    Condition, EntitySchema, FieldType, QueryCompiler, SearchFilter, SearchValue, Searchable, Sort,
};

fn condition(key: &str, value: &str) -> Condition {
    searchable::parse_condition(key, value).unwrap().unwrap()
}

#[test]
fn parameter_map_to_compiled_query() {
    let mut search = Searchable::from_params(vec![
        ("name_like", SearchValue::from("foo")),
        ("age_gte", SearchValue::from(18)),
        ("id_in", SearchValue::from(vec![1i64, 2, 3])),
    ])
    .unwrap();
    search.set_page(1, 10);
    search.add_sort(Sort::desc("age"));

    let compiled = QueryCompiler::new().compile(&search);

    assert_eq!(
        compiled.clause,
        " and name like :param_1 and age >= :param_2 and id in :param_3"
    );
    assert_eq!(
        compiled.params,
        vec![
            SearchValue::from("%foo%"),
            SearchValue::Int(18),
            SearchValue::List(vec![
                SearchValue::Int(1),
                SearchValue::Int(2),
                SearchValue::Int(3),
            ]),
        ]
    );
    assert_eq!(compiled.order_clause.as_deref(), Some("order by age desc"));
    assert_eq!(compiled.page, Some((10, 10)));
}

#[test]
fn json_object_to_compiled_query() {
    let body = json!({
        "name_like": "foo",
        "active_eq": true,
        "comment_like": "",
        "modified_gte_date": "2024-01-15"
    });

    let search = Searchable::from_json(body.as_object().unwrap()).unwrap();
    let compiled = QueryCompiler::new().compile(&search);

    // the blank comment filter is dropped, everything else keeps body order
    assert_eq!(
        compiled.clause,
        " and name like :param_1 and active = :param_2 and modified >= :param_3"
    );
    assert_eq!(compiled.params[0], SearchValue::from("%foo%"));
    assert_eq!(compiled.params[1], SearchValue::Bool(true));
    assert!(matches!(compiled.params[2], SearchValue::DateTime(_)));
}

#[test]
fn schema_conversion_before_compilation() {
    let schema = EntitySchema::builder()
        .field("name", FieldType::Text)
        .field("age", FieldType::Int)
        .build();

    let mut search =
        Searchable::from_params(vec![("name_like", "foo"), ("age_gte", "18")]).unwrap();
    search.convert(&schema).unwrap();

    let compiled = QueryCompiler::new().compile(&search);
    assert_eq!(compiled.params[1], SearchValue::Int(18));
}

#[test]
fn grouped_filters_share_the_parameter_counter() {
    let mut search = Searchable::new();
    search.add_filter(SearchFilter::and_group(
        condition("a_eq", "1"),
        vec![SearchFilter::or_group(
            condition("b_eq", "2"),
            vec![condition("c_eq", "3").into()],
        )],
    ));
    search.add_filter(condition("d_eq", "4").into());

    let compiled = QueryCompiler::new().compile(&search);
    assert_eq!(
        compiled.clause,
        " and (a = :param_1 and (b = :param_2 or c = :param_3)) and d = :param_4"
    );
}

#[test]
fn replacing_a_filter_keeps_its_position() {
    let mut search =
        Searchable::from_params(vec![("name_like", "a"), ("age_gte", "18")]).unwrap();
    search.add_search_param("name_like", "b").unwrap();

    let compiled = QueryCompiler::new().compile(&search);
    assert_eq!(compiled.clause, " and name like :param_1 and age >= :param_2");
    assert_eq!(compiled.params[0], SearchValue::from("%b%"));
}

#[test]
fn custom_conditions_are_handled_out_of_band() {
    let mut search = Searchable::new();
    search.add_search_param("tenant", "acme").unwrap();
    search.add_search_param("name_eq", "foo").unwrap();
    search.add_filter(Condition::custom_fragment("length(name) <", 32).into());

    let compiled = QueryCompiler::new().compile(&search);
    assert_eq!(
        compiled.clause,
        " and name = :param_1 and length(name) < :param_2"
    );
    // the custom condition stays readable for the caller
    assert_eq!(search.value("tenant"), Some(&SearchValue::from("acme")));
}

#[test]
fn alias_is_applied_across_clause_and_ordering() {
    let mut search = Searchable::from_params(vec![("name_like", "foo")]).unwrap();
    search.add_sort(Sort::asc("name").and(Sort::desc("age")));

    let compiled = QueryCompiler::with_alias("e").compile(&search);
    assert_eq!(compiled.clause, " and e.name like :param_1");
    assert_eq!(
        compiled.order_clause.as_deref(),
        Some("order by e.name asc, e.age desc")
    );
}

#[test]
fn conversion_is_a_one_time_pass() {
    let schema = EntitySchema::builder()
        .field("age", FieldType::Int)
        .build();

    let mut search = Searchable::from_params(vec![("age_gte", "18")]).unwrap();
    search.convert(&schema).unwrap();
    search.convert(&EntitySchema::builder().build()).unwrap();

    let compiled = QueryCompiler::new().compile(&search);
    assert_eq!(compiled.params, vec![SearchValue::Int(18)]);
}
