//! Reply text, keyboards and inline results for comics

use crate::xkcd::XkcdError;
use reqwest::Url;
use std::fmt::Display;
use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, InlineQueryResult, InlineQueryResultPhoto,
};

/// Callback data prefix of the "Hover text" button
pub const ALT_CALLBACK_PREFIX: &str = "alt";
/// Label of the hover-text button
pub const HOVER_TEXT_LABEL: &str = "Hover text";
/// Label of the explanation link button
pub const EXPLANATION_LABEL: &str = "Explanation...";

/// Comic permalink, e.g. `https://xkcd.com/614`
#[must_use]
pub fn permalink(num: impl Display) -> String {
    format!("https://xkcd.com/{num}")
}

/// Explanation wiki page of a comic
#[must_use]
pub fn explanation_url(num: impl Display) -> String {
    format!("https://www.explainxkcd.com/wiki/index.php/{num}")
}

/// Callback payload that asks for the hover text of comic `num`
#[must_use]
pub fn alt_callback_data(num: impl Display) -> String {
    format!("{ALT_CALLBACK_PREFIX} {num}")
}

fn parse_url(raw: &str) -> Result<Url, XkcdError> {
    Url::parse(raw).map_err(|e| XkcdError::InvalidUrl(format!("{raw}: {e}")))
}

/// Keyboard attached to every comic reply
///
/// # Errors
///
/// Returns `XkcdError::InvalidUrl` if `num` does not form a valid wiki URL.
pub fn comic_keyboard(num: impl Display) -> Result<InlineKeyboardMarkup, XkcdError> {
    let explanation = parse_url(&explanation_url(&num))?;
    Ok(InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback(HOVER_TEXT_LABEL, alt_callback_data(&num)),
        InlineKeyboardButton::url(EXPLANATION_LABEL, explanation),
    ]]))
}

/// Inline photo result for comic `num` showing `img`
///
/// # Errors
///
/// Returns `XkcdError::InvalidUrl` if `img` is not an absolute URL.
pub fn inline_photo(num: impl Display, img: &str) -> Result<InlineQueryResult, XkcdError> {
    let image = parse_url(img)?;
    let photo = InlineQueryResultPhoto::new(num.to_string(), image.clone(), image)
        .caption(permalink(&num))
        .reply_markup(comic_keyboard(&num)?);
    Ok(InlineQueryResult::Photo(photo))
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::InlineKeyboardButtonKind;

    #[test]
    fn test_links() {
        assert_eq!(permalink(1), "https://xkcd.com/1");
        assert_eq!(permalink("614"), "https://xkcd.com/614");
        assert_eq!(
            explanation_url(2048),
            "https://www.explainxkcd.com/wiki/index.php/2048"
        );
        assert_eq!(alt_callback_data(42), "alt 42");
    }

    #[test]
    fn test_comic_keyboard() -> Result<(), XkcdError> {
        let markup = comic_keyboard(614)?;
        assert_eq!(markup.inline_keyboard.len(), 1);
        let row = &markup.inline_keyboard[0];
        assert_eq!(row.len(), 2);

        assert_eq!(row[0].text, HOVER_TEXT_LABEL);
        assert!(matches!(
            &row[0].kind,
            InlineKeyboardButtonKind::CallbackData(data) if data == "alt 614"
        ));

        assert_eq!(row[1].text, EXPLANATION_LABEL);
        assert!(matches!(
            &row[1].kind,
            InlineKeyboardButtonKind::Url(url)
                if url.as_str() == "https://www.explainxkcd.com/wiki/index.php/614"
        ));
        Ok(())
    }

    #[test]
    fn test_inline_photo() -> Result<(), XkcdError> {
        let result = inline_photo(303, "https://www.explainxkcd.com/wiki/images/7/7d/compiling.png")?;
        let InlineQueryResult::Photo(photo) = result else {
            panic!("expected a photo result");
        };
        assert_eq!(photo.caption.as_deref(), Some("https://xkcd.com/303"));
        assert_eq!(
            photo.photo_url.as_str(),
            "https://www.explainxkcd.com/wiki/images/7/7d/compiling.png"
        );
        assert_eq!(photo.photo_url, photo.thumbnail_url);
        assert!(photo.reply_markup.is_some());
        Ok(())
    }

    #[test]
    fn test_inline_photo_rejects_relative_image() {
        assert!(matches!(
            inline_photo(1, "/images/1.png"),
            Err(XkcdError::InvalidUrl(_))
        ));
    }
}
