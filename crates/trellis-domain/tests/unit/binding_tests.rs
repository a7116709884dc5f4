//! Tests for request parameter binding

use serde::Deserialize;
use serde_json::json;
use trellis_domain::value_objects::{
    BindTarget, FieldCoercion, ParamBinding, ParamSource, validation_messages,
};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct SearchDto {
    #[validate(length(min = 1, message = "\"name\" must not be empty"))]
    name: String,
    #[validate(range(min = 1, max = 100, message = "\"pageSize\" must be between 1 and 100"))]
    page_size: u32,
}

impl BindTarget for SearchDto {
    const COERCIONS: &'static [FieldCoercion] = &[FieldCoercion::number("pageSize")];

    fn check(&self) -> Result<(), Vec<String>> {
        self.validate().map_err(|e| validation_messages(&e))
    }
}

#[test]
fn keyed_numeric_binding_decodes_integer() {
    let binding = ParamBinding::new::<i64>(ParamSource::Query, 0, Some("age"));
    let argument = binding.bind(json!("30")).unwrap();
    assert_eq!(argument.raw(), &json!(30));
}

#[test]
fn keyed_numeric_binding_rejects_text() {
    let binding = ParamBinding::new::<i64>(ParamSource::Query, 0, Some("age"));
    let error = binding.bind(json!("abc")).unwrap_err();

    assert_eq!(error.status(), 400);
    assert!(error.public_message().contains("age"));
}

#[test]
fn dto_constraints_are_aggregated() {
    let binding = ParamBinding::new::<SearchDto>(ParamSource::Query, 0, None);
    let error = binding
        .bind(json!({"name": "", "pageSize": "500"}))
        .unwrap_err();

    assert_eq!(
        error.public_message(),
        "\"name\" must not be empty; \"pageSize\" must be between 1 and 100"
    );
}

#[test]
fn missing_required_field_is_a_validation_error() {
    let binding = ParamBinding::new::<SearchDto>(ParamSource::Body, 1, None);
    let error = binding.bind(json!({"name": "ada"})).unwrap_err();

    assert_eq!(error.status(), 400);
    assert!(error.public_message().contains("pageSize"));
}

#[test]
fn optional_dto_keeps_field_coercions() {
    assert_eq!(
        <Option<SearchDto> as BindTarget>::COERCIONS,
        SearchDto::COERCIONS
    );

    let binding = ParamBinding::new::<Option<SearchDto>>(ParamSource::Query, 0, None);
    let argument = binding
        .bind(json!({"name": "ada", "pageSize": "25"}))
        .unwrap();
    assert_eq!(argument.raw()["pageSize"], json!(25));
}
