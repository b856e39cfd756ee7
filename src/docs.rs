use axum::Json;
use axum::response::Html;
use serde_json::{Value, json};

const DOCS_PAGE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>Dynamic LLM API - Docs</title>
  <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.ui = SwaggerUIBundle({ url: "/openapi.json", dom_id: "#swagger-ui" });
  </script>
</body>
</html>
"##;

pub async fn docs_page() -> Html<&'static str> {

    Html(DOCS_PAGE)

}

pub async fn openapi_spec() -> Json<Value> {

    Json(openapi_document())

}

pub fn openapi_document() -> Value {

    let error = |description: &str| json!({
        "description": description,
        "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Error"}}}
    });

    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Dynamic LLM API",
            "description": "Real-time AI responses for the user questionnaire",
            "version": "1.0"
        },
        "paths": {
            "/api/query": {
                "post": {
                    "summary": "Ask the language model a question",
                    "requestBody": {
                        "required": true,
                        "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Query"}}}
                    },
                    "responses": {
                        "200": {
                            "description": "Generated answer",
                            "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Answer"}}}
                        },
                        "400": error("Empty question or unreadable body"),
                        "401": error("Provider rejected the API key"),
                        "500": error("API key not configured or provider failure")
                    }
                }
            },
            "/health": {
                "get": {
                    "summary": "Liveness probe",
                    "responses": {
                        "200": {"description": "Service is up", "content": {"text/plain": {"schema": {"type": "string"}}}}
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Query": {
                    "type": "object",
                    "required": ["question"],
                    "properties": {
                        "question": {"type": "string"},
                        "model": {"type": "string", "default": crate::models::DEFAULT_MODEL},
                        "temperature": {"type": "number", "default": crate::models::DEFAULT_TEMPERATURE}
                    }
                },
                "Answer": {
                    "type": "object",
                    "required": ["answer", "model", "tokens_used", "timestamp"],
                    "properties": {
                        "answer": {"type": "string"},
                        "model": {"type": "string"},
                        "tokens_used": {"type": "integer"},
                        "timestamp": {"type": "string", "format": "date-time"}
                    }
                },
                "Error": {
                    "type": "object",
                    "required": ["detail"],
                    "properties": {"detail": {"type": "string"}}
                }
            }
        }
    })

}
