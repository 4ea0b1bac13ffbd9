use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Query sent by the health probe.
pub const TYPENAME_PROBE: &str = "{ __typename }";

/// GraphQL payload forwarded to the content API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQLRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Value>,
    #[serde(rename = "operationName", skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

impl GraphQLRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: None,
            operation_name: None,
        }
    }

    pub fn with_variables(mut self, variables: Value) -> Self {
        self.variables = Some(variables);
        self
    }

    pub fn with_operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    pub fn typename_probe() -> Self {
        Self::new(TYPENAME_PROBE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_fields_are_omitted() {
        let body = serde_json::to_value(GraphQLRequest::typename_probe()).unwrap();
        assert_eq!(body, json!({ "query": "{ __typename }" }));
    }

    #[test]
    fn test_operation_name_is_camel_case() {
        let req = GraphQLRequest::new("query Page($id: ID!) { page(id: $id) { title } }")
            .with_variables(json!({ "id": "42" }))
            .with_operation_name("Page");
        let body = serde_json::to_value(req).unwrap();
        assert_eq!(body["operationName"], "Page");
        assert_eq!(body["variables"]["id"], "42");
    }
}
