//! Document composer: renders a contract template and one employee record
//! into a paginated F4 PDF ending in a signature placeholder page.

mod layout;

use std::collections::HashSet;

use pdf_writer::{Filter, Name, Pdf, Rect, Ref};

use crate::error::Error;
use crate::fonts::register_font;
use crate::model::{ContractDates, ContractTemplate, Employee};
use crate::resolve::resolve_placeholders;

use layout::{BODY_LINE_H, BODY_SIZE, LayoutState, MARGIN, PAGE_HEIGHT, PAGE_WIDTH};

const HEADER_SIZE: f32 = 14.0;
const ARTICLE_SIZE: f32 = 12.0;
// Space required before starting an article title, so a clause heading is
// not stranded at the very bottom of a page.
const ARTICLE_PRECHECK: f32 = 60.0;
const BLOCK_GAP: f32 = 20.0;

const SIGNATURE_TITLE: &str = "Halaman Tanda Tangan";
const SIGNATURE_NOTICE: &str = "[Placeholder - Halaman ini akan diganti dengan TTD basah]";

struct ResolvedArticle {
    title: String,
    subtitle: String,
    content: String,
}

/// Produce the draft contract document. Deterministic for identical inputs:
/// no wall-clock reads, no randomness; the "today" token comes from the
/// supplied date pair. The final page is always the signature placeholder.
pub fn compose(
    template: &ContractTemplate,
    employee: &Employee,
    dates: &ContractDates,
) -> Result<Vec<u8>, Error> {
    employee.validate()?;
    template.validate()?;

    let resolve = |text: &str| resolve_placeholders(text, employee, dates);

    let header_title = resolve(&template.header_title);
    let contract_number = format!("Nomor: {}", employee.contract_number);
    let opening = template
        .opening_text
        .as_deref()
        .map(resolve)
        .filter(|t| !t.is_empty());
    let closing = template
        .closing_text
        .as_deref()
        .map(resolve)
        .filter(|t| !t.is_empty());
    let articles: Vec<ResolvedArticle> = template
        .articles
        .iter()
        .map(|a| ResolvedArticle {
            title: resolve(&a.title),
            subtitle: resolve(&a.subtitle),
            content: resolve(&a.content),
        })
        .collect();

    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();

    // Characters the document will show, for font subsetting.
    let mut used_chars: HashSet<char> = HashSet::new();
    used_chars.extend(header_title.chars());
    used_chars.extend(contract_number.chars());
    used_chars.extend(SIGNATURE_TITLE.chars());
    used_chars.extend(SIGNATURE_NOTICE.chars());
    for text in opening.iter().chain(closing.iter()) {
        used_chars.extend(text.chars());
    }
    for article in &articles {
        used_chars.extend(article.title.chars());
        used_chars.extend(article.subtitle.chars());
        used_chars.extend(article.content.chars());
    }
    used_chars.insert(' ');

    let regular = register_font(&mut pdf, false, "F1", &mut alloc, &used_chars);
    let bold = register_font(&mut pdf, true, "F2", &mut alloc, &used_chars);

    let mut state = LayoutState::new();

    // Header: centered title, centered contract number, separator rule.
    state.draw_centered(&header_title, &bold, HEADER_SIZE);
    state.advance(20.0);
    state.draw_centered(&contract_number, &regular, BODY_SIZE);
    state.advance(10.0);
    state.draw_rule();
    state.advance(30.0);

    if let Some(text) = &opening {
        state.draw_body(text, &regular, BODY_SIZE, BODY_LINE_H);
        state.advance(BLOCK_GAP);
    }

    // Template array order is the clause order.
    for article in &articles {
        state.ensure_space(ARTICLE_PRECHECK);
        state.draw_centered(&article.title, &bold, ARTICLE_SIZE);
        state.advance(BODY_LINE_H);
        state.draw_centered(&article.subtitle, &bold, ARTICLE_SIZE);
        state.advance(24.0);
        state.draw_body(&article.content, &regular, BODY_SIZE, BODY_LINE_H);
        state.advance(BLOCK_GAP);
    }

    if let Some(text) = &closing {
        state.draw_body(text, &regular, BODY_SIZE, BODY_LINE_H);
        state.advance(BLOCK_GAP);
    }

    // Trailing placeholder page; the merge step replaces it with the signed
    // page. Always exactly one page, always last.
    state.new_page();
    state.draw_text_at(SIGNATURE_TITLE, MARGIN, PAGE_HEIGHT - MARGIN, &bold, 16.0);
    state.draw_text_at(SIGNATURE_NOTICE, MARGIN, PAGE_HEIGHT / 2.0, &regular, BODY_SIZE);

    let contents = state.finish();
    let n = contents.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    for (i, content) in contents.into_iter().enumerate() {
        let raw = content.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed)
            .filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        let mut fonts = resources.fonts();
        fonts.pair(Name(regular.pdf_name.as_bytes()), regular.font_ref);
        fonts.pair(Name(bold.pdf_name.as_bytes()), bold.font_ref);
    }

    log::debug!(
        "compose: {} article(s) over {} page(s) for {}",
        articles.len(),
        n,
        employee.ni_pppk,
    );

    Ok(pdf.finish())
}
