//! Shared text sent by the bot.
//!
//! Keep all user-facing strings in this module so they stay in one place and are
//! easy to update or translate.

pub const HELP_TEXT: &str = "👋 Привет! Я бот для обработки прайсов авто.\n\n\
     📸 Пришли мне картинку прайса — я распознаю все позиции и запишу в Google таблицу.\n\n\
     Поддерживаю прайсы на английском и китайском языке.";

pub const PHOTO_RECEIVED: &str = "📥 Получил картинку, обрабатываю прайс...";
pub const DOCUMENT_RECEIVED: &str = "📥 Получил файл, обрабатываю...";
pub const RECOGNIZING: &str = "🔍 Распознаю данные с помощью AI...";
pub const NO_ROWS_FOUND: &str = "❌ Не удалось найти данные в прайсе. Попробуй другую картинку.";
pub const MALFORMED_REPLY: &str =
    "❌ Ошибка при разборе данных. Попробуй ещё раз или пришли более чёткую картинку.";
pub const SEND_AN_IMAGE: &str = "Пришли картинку прайса (фото или изображение).";

pub fn rows_found_text(count: usize) -> String {
    format!("📊 Найдено {count} позиций, записываю в таблицу...")
}

pub fn rows_written_text(count: usize, sheet_name: &str) -> String {
    format!("✅ Готово! Добавлено {count} позиций в таблицу.\n📋 Вкладка: {sheet_name}")
}

pub fn error_text(err: &dyn std::fmt::Display) -> String {
    format!("❌ Ошибка: {err}")
}
