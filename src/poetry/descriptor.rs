//! Tool descriptor
//!
//! Static document served on `/mcp/describe`, telling a language model what
//! the query tool does and which parameters it accepts.

use serde::Serialize;

use super::catalog::Dynasty;

pub const TOOL_NAME: &str = "PoetryQuery";
pub const TOOL_DESCRIPTION: &str = "查询中国古诗词，支持按关键词或朝代筛选";

const KEYWORD_DESCRIPTION: &str = "查询关键词（如“月”“思乡”，为空则随机返回）";
const DYNASTY_DESCRIPTION: &str = "朝代筛选（可选，如“唐”“宋”）";

#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: ParameterSchema,
}

/// JSON-schema style object describing the call body
#[derive(Debug, Clone, Serialize)]
pub struct ParameterSchema {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub properties: ToolProperties,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolProperties {
    pub keyword: PropertySchema,
    pub dynasty: PropertySchema,
}

#[derive(Debug, Clone, Serialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<&'static str>>,
    pub description: &'static str,
}

impl ToolDescriptor {
    pub fn new() -> Self {
        Self {
            name: TOOL_NAME,
            description: TOOL_DESCRIPTION,
            parameters: ParameterSchema {
                kind: "object",
                properties: ToolProperties {
                    keyword: PropertySchema {
                        kind: "string",
                        choices: None,
                        description: KEYWORD_DESCRIPTION,
                    },
                    dynasty: PropertySchema {
                        kind: "string",
                        choices: Some(Dynasty::ALL.iter().map(|d| d.as_str()).collect()),
                        description: DYNASTY_DESCRIPTION,
                    },
                },
            },
        }
    }
}

impl Default for ToolDescriptor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_descriptor_document() {
        let value = serde_json::to_value(ToolDescriptor::new()).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "PoetryQuery",
                "description": "查询中国古诗词，支持按关键词或朝代筛选",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "keyword": {
                            "type": "string",
                            "description": "查询关键词（如“月”“思乡”，为空则随机返回）"
                        },
                        "dynasty": {
                            "type": "string",
                            "enum": ["唐", "宋", "元", "明", "清"],
                            "description": "朝代筛选（可选，如“唐”“宋”）"
                        }
                    }
                }
            })
        );
    }

    #[test]
    fn test_keyword_has_no_enum() {
        let value = serde_json::to_value(ToolDescriptor::new()).unwrap();
        assert!(value["parameters"]["properties"]["keyword"]
            .get("enum")
            .is_none());
    }
}
