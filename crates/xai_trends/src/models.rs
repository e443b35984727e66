use common::{TrendError, TrendResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SAMPLING_TEMPERATURE: f32 = 0.2;

pub const TREND_PROMPT: &str = "ここ12時間のX(旧：Twitter)での、IT技術についての話題を収集して、ホットな話題になっているIT技術情報について、以下のフォーマットで返却してください。
情報の記述形式は、シンプルな「見出し＋簡潔な内容」、での箇条書きでお願いします。

-----

■最新のIT技術トレンド情報
[[ここに収集した情報を入れる]]

■最新のIT脆弱性情報
[[ここに収集した情報を入れる]]


";

#[derive(Debug, Serialize)]
pub struct ResponsesRequest {
    pub model: String,
    pub input: Vec<InputMessage>,
    pub temperature: f32,
    pub tools: Vec<SearchTool>,
    pub tool_choice: &'static str,
}

#[derive(Debug, Serialize)]
pub struct InputMessage {
    pub role: &'static str,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct SearchTool {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub from_date: String,
    pub to_date: String,
}

impl ResponsesRequest {
    pub fn trend_digest(model: &str, date: &str) -> Self {
        Self {
            model: model.to_string(),
            input: vec![InputMessage {
                role: "user",
                content: TREND_PROMPT.to_string(),
            }],
            temperature: SAMPLING_TEMPERATURE,
            tools: vec![SearchTool {
                kind: "x_search",
                from_date: date.to_string(),
                to_date: date.to_string(),
            }],
            tool_choice: "auto",
        }
    }
}

// Lists are optional so an explicit `null` decodes like a missing key.
#[derive(Debug, Default, Deserialize)]
pub struct ResponsePayload {
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
    #[serde(default)]
    pub output_text: Option<String>,
    #[serde(default)]
    pub output: Option<Vec<OutputItem>>,
    #[serde(default)]
    pub choices: Option<Vec<Choice>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub code: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorBody {
    pub fn describe(&self) -> String {
        let code = self.code.as_ref().and_then(|code| match code {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        });

        let parts: Vec<String> = [self.kind.clone(), code, self.message.clone()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect();

        if parts.is_empty() {
            "unknown error".to_string()
        } else {
            parts.join(" ")
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct OutputItem {
    #[serde(default)]
    pub content: Option<Vec<OutputContent>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OutputContent {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug)]
pub enum ResponseShape {
    Consolidated(String),
    OutputItems(Vec<OutputItem>),
    ChatChoices(Vec<Choice>),
}

impl ResponseShape {
    pub fn text(&self) -> Option<String> {
        let text = match self {
            ResponseShape::Consolidated(text) => text.clone(),
            ResponseShape::OutputItems(items) => items
                .iter()
                .flat_map(|item| item.content.iter().flatten())
                .filter(|content| content.kind.as_deref() == Some("output_text"))
                .filter_map(|content| content.text.as_deref())
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
            ResponseShape::ChatChoices(choices) => choices
                .first()
                .and_then(|choice| choice.message.as_ref())
                .and_then(|message| message.content.as_deref())
                .map(str::to_string)
                .unwrap_or_default(),
        };

        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

impl ResponsePayload {
    pub fn into_shapes(self) -> Vec<ResponseShape> {
        let mut shapes = Vec::with_capacity(3);
        if let Some(text) = self.output_text {
            shapes.push(ResponseShape::Consolidated(text));
        }
        if let Some(output) = self.output.filter(|items| !items.is_empty()) {
            shapes.push(ResponseShape::OutputItems(output));
        }
        if let Some(choices) = self.choices.filter(|choices| !choices.is_empty()) {
            shapes.push(ResponseShape::ChatChoices(choices));
        }
        shapes
    }

    pub fn into_text(self) -> TrendResult<String> {
        if let Some(error) = &self.error {
            return Err(TrendError::Api(error.describe()));
        }

        self.into_shapes()
            .iter()
            .find_map(ResponseShape::text)
            .ok_or(TrendError::EmptyResponse)
    }
}
