#![allow(dead_code)]

use chrono::{NaiveDate, TimeZone, Utc};
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref, Str};

use pppk_kontrak::{ContractTemplate, ContractType, Employee, TemplateArticle};

pub fn sample_employee() -> Employee {
    serde_json::from_value(serde_json::json!({
        "contractNumber": "800/001/2024",
        "nik": "3201011501880001",
        "participantId": "P-0442",
        "fullName": "Budi Santoso",
        "birthPlace": "Bogor",
        "birthDate": "1988-01-15",
        "gender": "LAKI-LAKI",
        "niPppk": "198801152024211001",
        "address": "Jl. Merdeka No. 1, Bogor",
        "position": "Guru Ahli Pertama",
        "unitName": "SDN 01 Pagi",
        "education": "S1 PGSD",
        "gradeClass": "IX",
        "salaryNumeric": 3_500_000u64,
        "salaryWords": "tiga juta lima ratus ribu rupiah",
        "graduationYear": 2010,
        "contractType": "PENUH_WAKTU",
    }))
    .expect("sample employee json")
}

pub fn article(title: &str, subtitle: &str, content: &str) -> TemplateArticle {
    TemplateArticle {
        title: title.to_string(),
        subtitle: subtitle.to_string(),
        content: content.to_string(),
    }
}

pub fn sample_template(articles: Vec<TemplateArticle>) -> ContractTemplate {
    ContractTemplate {
        id: "tpl-1".to_string(),
        name: "Perjanjian Kerja PPPK".to_string(),
        contract_type: ContractType::PenuhWaktu,
        header_title: "PERJANJIAN KERJA PEGAWAI PEMERINTAH".to_string(),
        opening_text: Some(
            "Pada hari ini, {{HARI_INI_LONG}}, yang bertanda tangan di bawah ini \
             {{NAMA_LENGKAP}} dengan NI PPPK {{NI_PPPK}} sepakat mengadakan \
             perjanjian kerja."
                .to_string(),
        ),
        articles,
        closing_text: Some(
            "Demikian perjanjian ini dibuat untuk dipergunakan sebagaimana mestinya."
                .to_string(),
        ),
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}

pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 14).unwrap()
}

pub fn page_count(pdf: &[u8]) -> usize {
    lopdf::Document::load_mem(pdf)
        .expect("load generated pdf")
        .get_pages()
        .len()
}

/// Decompressed content streams per page, in page order.
pub fn page_contents(pdf: &[u8]) -> Vec<String> {
    let doc = lopdf::Document::load_mem(pdf).expect("load generated pdf");
    doc.get_pages()
        .values()
        .map(|&id| {
            let raw = doc.get_page_content(id).expect("page content");
            String::from_utf8_lossy(&raw).into_owned()
        })
        .collect()
}

/// Byte offset of `needle` inside the concatenated page contents. Drawn
/// strings appear as literal `(...)` arguments of show operators, so plain
/// ASCII needles can be searched for directly.
pub fn find_in_contents(contents: &[String], needle: &str) -> Option<usize> {
    let all = contents.concat();
    all.find(needle)
}

/// Build a standalone PDF with `pages` identical pages, each showing the
/// given marker text in a base-14 font. Zero pages yields a well-formed
/// document with an empty page tree.
pub fn donor_pdf(pages: usize, marker: &str) -> Vec<u8> {
    let mut pdf = Pdf::new();
    let mut next_id = 1;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let font_id = alloc();

    let page_ids: Vec<Ref> = (0..pages).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..pages).map(|_| alloc()).collect();

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(pages as i32);
    pdf.type1_font(font_id).base_font(Name(b"Helvetica"));

    for i in 0..pages {
        let mut content = Content::new();
        content
            .begin_text()
            .set_font(Name(b"F1"), 12.0)
            .next_line(72.0, 720.0)
            .show(Str(marker.as_bytes()))
            .end_text();
        let data = content.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(&data, 6);
        pdf.stream(content_ids[i], &compressed)
            .filter(Filter::FlateDecode);

        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, 595.0, 842.0))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        let mut fonts = resources.fonts();
        fonts.pair(Name(b"F1"), font_id);
        fonts.finish();
        resources.finish();
        page.finish();
    }

    pdf.finish()
}
