//! Placeholder resolution: expands the closed set of `{{...}}` tokens in
//! template text against one employee record and one computed date pair.
//!
//! The substitution table is built fresh per call as a plain token→value
//! list. Matching is exact-string and case-sensitive; every occurrence of a
//! recognized token is replaced; unrecognized tokens pass through unchanged.

use crate::dates::{format_day_long, format_long};
use crate::model::{ContractDates, Employee};

pub struct Placeholder {
    pub token: &'static str,
    pub description: &'static str,
}

/// The full token set, in the order the template editor lists it.
pub const PLACEHOLDERS: [Placeholder; 16] = [
    Placeholder { token: "{{NAMA_LENGKAP}}", description: "Nama Lengkap Pegawai" },
    Placeholder { token: "{{NI_PPPK}}", description: "Nomor Induk PPPK" },
    Placeholder { token: "{{NIK}}", description: "Nomor Induk Kependudukan" },
    Placeholder { token: "{{JABATAN}}", description: "Jabatan Pegawai" },
    Placeholder { token: "{{UNIT_KERJA}}", description: "Unit Kerja Penempatan" },
    Placeholder { token: "{{TEMPAT_LAHIR}}", description: "Tempat Lahir Pegawai" },
    Placeholder { token: "{{TANGGAL_LAHIR}}", description: "Tanggal Lahir (dd MMMM yyyy)" },
    Placeholder { token: "{{PENDIDIKAN}}", description: "Pendidikan Terakhir" },
    Placeholder { token: "{{ALAMAT}}", description: "Alamat Lengkap Pegawai" },
    Placeholder { token: "{{GAJI_ANGKA}}", description: "Gaji Pokok (Angka)" },
    Placeholder { token: "{{GAJI_TERBILANG}}", description: "Gaji Pokok (Terbilang)" },
    Placeholder { token: "{{MASA_KONTRAK_TAHUN}}", description: "Durasi Kontrak (Angka, cth: 5)" },
    Placeholder { token: "{{MASA_KONTRAK_TERBILANG}}", description: "Durasi Kontrak (Terbilang, cth: lima)" },
    Placeholder { token: "{{TANGGAL_MULAI_KONTRAK}}", description: "Tanggal Mulai Kontrak (dd MMMM yyyy)" },
    Placeholder { token: "{{TANGGAL_SELESAI_KONTRAK}}", description: "Tanggal Selesai Kontrak (dd MMMM yyyy)" },
    Placeholder { token: "{{HARI_INI_LONG}}", description: "Tanggal penandatanganan (Selasa, 14 Mei 2024)" },
];

/// Spell out a contract duration in years. Only the values produced by the
/// two contract categories are worded; anything else renders as digits.
fn duration_in_words(years: u32) -> String {
    match years {
        1 => "satu".to_string(),
        5 => "lima".to_string(),
        n => n.to_string(),
    }
}

/// `3500000` → `3.500.000` (id-ID digit grouping).
fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Replace every recognized token in `text`. Pure: identical inputs yield
/// identical output, and text without tokens is returned unchanged.
pub fn resolve_placeholders(text: &str, employee: &Employee, dates: &ContractDates) -> String {
    if text.is_empty() {
        return String::new();
    }

    let duration_years = employee.contract_type.duration_years();

    let replacements: [(&str, String); 16] = [
        ("{{NAMA_LENGKAP}}", employee.full_name.clone()),
        ("{{NI_PPPK}}", employee.ni_pppk.clone()),
        ("{{NIK}}", employee.nik.clone()),
        ("{{JABATAN}}", employee.position.clone()),
        ("{{UNIT_KERJA}}", employee.unit_name.clone()),
        ("{{TEMPAT_LAHIR}}", employee.birth_place.clone()),
        ("{{TANGGAL_LAHIR}}", format_long(employee.birth_date)),
        ("{{PENDIDIKAN}}", employee.education.clone()),
        ("{{ALAMAT}}", employee.address.clone()),
        ("{{GAJI_ANGKA}}", format_thousands(employee.salary_numeric)),
        ("{{GAJI_TERBILANG}}", employee.salary_words.clone()),
        ("{{MASA_KONTRAK_TAHUN}}", duration_years.to_string()),
        ("{{MASA_KONTRAK_TERBILANG}}", duration_in_words(duration_years)),
        ("{{TANGGAL_MULAI_KONTRAK}}", format_long(dates.start)),
        ("{{TANGGAL_SELESAI_KONTRAK}}", format_long(dates.end)),
        ("{{HARI_INI_LONG}}", format_day_long(dates.start)),
    ];

    let mut result = text.to_string();
    for (token, value) in &replacements {
        result = result.replace(token, value);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ContractType;
    use chrono::NaiveDate;

    fn sample_employee() -> Employee {
        Employee {
            contract_number: "800/001/2024".into(),
            nik: "3201011501880001".into(),
            participant_id: "P-0442".into(),
            full_name: "Budi Santoso".into(),
            birth_place: "Bogor".into(),
            birth_date: NaiveDate::from_ymd_opt(1988, 1, 15).unwrap(),
            gender: Default::default(),
            ni_pppk: "198801152024211001".into(),
            address: "Jl. Merdeka No. 1".into(),
            position: "Guru Ahli Pertama".into(),
            unit_name: "SDN 01 Pagi".into(),
            education: "S1 PGSD".into(),
            grade_class: "IX".into(),
            salary_numeric: 3_500_000,
            salary_words: "tiga juta lima ratus ribu rupiah".into(),
            graduation_year: 2010,
            contract_type: ContractType::PenuhWaktu,
            status: Default::default(),
            start_date: None,
            end_date: None,
        }
    }

    fn sample_dates() -> ContractDates {
        ContractDates::from_start(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            ContractType::PenuhWaktu,
        )
    }

    #[test]
    fn token_free_text_is_unchanged() {
        let text = "Pasal ini tidak memuat token apa pun.";
        assert_eq!(
            resolve_placeholders(text, &sample_employee(), &sample_dates()),
            text
        );
    }

    #[test]
    fn replaces_every_occurrence() {
        let out = resolve_placeholders(
            "{{NAMA_LENGKAP}} disebut PIHAK KEDUA. {{NAMA_LENGKAP}} menyetujui.",
            &sample_employee(),
            &sample_dates(),
        );
        assert_eq!(out, "Budi Santoso disebut PIHAK KEDUA. Budi Santoso menyetujui.");
    }

    #[test]
    fn unknown_tokens_pass_through() {
        let out = resolve_placeholders(
            "{{TIDAK_DIKENAL}} dan {{NI_PPPK}}",
            &sample_employee(),
            &sample_dates(),
        );
        assert_eq!(out, "{{TIDAK_DIKENAL}} dan 198801152024211001");
    }

    #[test]
    fn empty_text_resolves_to_empty() {
        assert_eq!(
            resolve_placeholders("", &sample_employee(), &sample_dates()),
            ""
        );
    }

    #[test]
    fn duration_tokens_follow_contract_type() {
        let mut employee = sample_employee();
        let out = resolve_placeholders(
            "{{MASA_KONTRAK_TAHUN}} ({{MASA_KONTRAK_TERBILANG}}) tahun",
            &employee,
            &sample_dates(),
        );
        assert_eq!(out, "5 (lima) tahun");

        employee.contract_type = ContractType::ParuhWaktu;
        let out = resolve_placeholders(
            "{{MASA_KONTRAK_TAHUN}} ({{MASA_KONTRAK_TERBILANG}}) tahun",
            &employee,
            &sample_dates(),
        );
        assert_eq!(out, "1 (satu) tahun");
    }

    #[test]
    fn date_tokens_use_long_indonesian_format() {
        let out = resolve_placeholders(
            "mulai {{TANGGAL_MULAI_KONTRAK}} s.d. {{TANGGAL_SELESAI_KONTRAK}}, ditandatangani {{HARI_INI_LONG}}",
            &sample_employee(),
            &sample_dates(),
        );
        assert_eq!(
            out,
            "mulai 01 Januari 2024 s.d. 31 Desember 2028, ditandatangani Senin, 01 Januari 2024"
        );
    }

    #[test]
    fn salary_figure_uses_id_grouping() {
        let out = resolve_placeholders(
            "Rp. {{GAJI_ANGKA}},-",
            &sample_employee(),
            &sample_dates(),
        );
        assert_eq!(out, "Rp. 3.500.000,-");
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1_000), "1.000");
        assert_eq!(format_thousands(12_345_678), "12.345.678");
    }
}
