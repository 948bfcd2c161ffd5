use serde::{Deserialize, Serialize};

pub const DEMO_CAPTION: &str = "Вот демо-версия вашей истории 🎬✨

Если нравится — оплатите и получите полную версию без водяных знаков + бонус: все фото в стиле Disney!

📲 Больше примеров и идей:
VK: https://vk.com/istoriym
Instagram: https://instagram.com/istoriym_bot";

pub const FINAL_CAPTION: &str = "Ваша история готова! ✨

Если потребуется другой формат или правки, просто напишите нам, и мы всё оперативно скорректируем.";

pub const MORE_EXAMPLES_URL: &str = "https://instagram.com/istoriym_bot";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl InlineKeyboardButton {
    pub fn callback(text: &str, data: String) -> Self {
        Self {
            text: text.to_string(),
            callback_data: Some(data),
            url: None,
        }
    }

    pub fn link(text: &str, url: &str) -> Self {
        Self {
            text: text.to_string(),
            callback_data: None,
            url: Some(url.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

impl InlineKeyboardMarkup {
    /// Pay / decline / more examples, one button per row.
    pub fn demo(questionnaire_id: i64) -> Self {
        Self {
            inline_keyboard: vec![
                vec![InlineKeyboardButton::callback(
                    "💳 Оплатить",
                    format!("payment:yes:{questionnaire_id}"),
                )],
                vec![InlineKeyboardButton::callback(
                    "❌ Отказаться",
                    format!("payment:no:{questionnaire_id}"),
                )],
                vec![InlineKeyboardButton::link("🔗 Больше примеров", MORE_EXAMPLES_URL)],
            ],
        }
    }

    pub fn delivery(questionnaire_id: i64) -> Self {
        Self {
            inline_keyboard: vec![
                vec![InlineKeyboardButton::callback(
                    "👍 Всё отлично",
                    format!("delivery:accept:{questionnaire_id}"),
                )],
                vec![InlineKeyboardButton::callback(
                    "✍️ Нужны правки",
                    format!("delivery:fix:{questionnaire_id}"),
                )],
            ],
        }
    }
}
