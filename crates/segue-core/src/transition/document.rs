use scraper::{Html, Selector};

use crate::{Error, Result};

/// The parts of a fetched document a content swap needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    /// Inner markup of the content container
    pub content_html: String,
    /// Page type named by the container
    pub template: String,
    pub title: Option<String>,
}

/// Locate the content container, its page type and the document title
pub fn parse_document(body: &str, content_selector: &str, template_attribute: &str) -> Result<ParsedDocument> {
    let html = Html::parse_document(body);

    let selector = parse_selector(content_selector)?;
    let container = html
        .select(&selector)
        .next()
        .ok_or_else(|| Error::MissingContainer(content_selector.to_string()))?;

    let template = container.value().attr(template_attribute).ok_or_else(|| {
        Error::MissingContainer(format!("{} has no {} attribute", content_selector, template_attribute))
    })?;

    let title_selector = parse_selector("title")?;
    let title = html
        .select(&title_selector)
        .next()
        .map(|title| title.text().collect::<String>().trim().to_string());

    Ok(ParsedDocument {
        content_html: container.inner_html(),
        template: template.to_string(),
        title,
    })
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| Error::Selector(format!("{}: {:?}", selector, e)))
}
