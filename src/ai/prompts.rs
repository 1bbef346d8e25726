//! Instruction prompts sent with every price-list image.
//!
//! Each schema generation has exactly one prompt. Changing the requested keys
//! here must go together with the column layout in [`crate::schema`].

/// Legacy generation: one USD price per row.
pub const LEGACY_PRICE_PROMPT: &str = r#"Ты парсишь прайс-лист автомобилей. Извлеки все строки из таблицы.

Для каждого автомобиля верни JSON объект с полями:
- brand: бренд (например BYD, Geely, Changan, Toyota и т.д.)
- model: модель (например Yuan UP, Starship 7 и т.д.)
- trim: комплектация (описание версии, если есть)
- color: цвет (если указан, иначе пустая строка)
- price: цена в USD (только число, без символов. Используй колонку "indicative price" или "FOB horgos USD")

Верни ТОЛЬКО валидный JSON массив без лишнего текста, например:
[
  {"brand": "BYD", "model": "Yuan UP", "trim": "Intelligent Driving 401KM transcendence", "color": "White Gray", "price": 119800},
  ...
]

Если прайс на китайском — переведи бренд и модель на английский или оставь транслитерацию."#;

/// Extended generation: factory price in CNY plus FOB price, with years.
pub const EXTENDED_PRICE_PROMPT: &str = r#"Ты парсишь прайс-лист автомобилей. Извлеки все строки из таблицы.

Для каждого автомобиля верни JSON объект с полями (все значения строками):
- brand: бренд (например BYD, Geely, Changan, Toyota и т.д.)
- model: модель (например Yuan UP, Starship 7 и т.д.)
- version: версия/комплектация полностью, как в прайсе (например "2026 60km Free")
- color: цвет (если указан, иначе пустая строка)
- model_year: модельный год, если указан отдельно (например "2026"), иначе пустая строка
- year: год выпуска, если указан отдельно, иначе пустая строка
- price_cny: цена завода в юанях, как написано в прайсе
- price_fob: цена FOB в USD (только число, без символов, иначе пустая строка)

Верни ТОЛЬКО валидный JSON массив без лишнего текста, например:
[
  {"brand": "BYD", "model": "Seal 06", "version": "2026 60km Free", "color": "White", "model_year": "", "year": "", "price_cny": "119,800", "price_fob": "14700"},
  ...
]

Если прайс на китайском — переведи бренд и модель на английский или оставь транслитерацию."#;
