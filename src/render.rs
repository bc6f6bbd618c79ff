//! Render Module
//!
//! 抽出済みレコードから出力ファイルのテキストを組み立てるモジュール。
//! ここではUnicode文字列のみを扱い、エンコーディングは出力層で
//! 一度だけ適用されます。

use std::collections::HashMap;
use std::fmt::Write as _;
use std::ops::Range;

use crate::record::{RecordKind, RecordSet};

/// ノート内の改行を置き換える結合デリミタ
///
/// 出力ファイルは1エントリ1行の形式なので、複数行ノートは
/// このデリミタで1行に畳み込まれます。消費側が行を復元します。
pub const NOTE_DELIMITER: &str = "§§";

/// 1言語のテキストファイル（`<code>.lng`）を描画する
///
/// セクションは固定の順序で出力され、レコードの無いセクションは
/// 丸ごと省略されます。各セクションはコメント行で始まり、
/// 空行で区切られます。
pub(crate) fn render_language_file(records: &RecordSet, code: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[{}]", code);

    for kind in RecordKind::LNG_SECTION_ORDER {
        let Some(entries) = records.get(code, kind) else {
            continue;
        };
        if entries.is_empty() {
            continue;
        }

        out.push_str(kind.section_comment());
        out.push('\n');
        for record in entries {
            let _ = writeln!(out, "{}{}={}", kind.key_tag(), record.key, record.text);
        }
        out.push('\n');
    }

    out
}

/// 1言語・1バンドのノートファイル（`<code><n>.lng`）を描画する
///
/// バンド内のすべてのパラメータ番号に対して行を出力します。
/// ノートの無い番号は空の値になります。同じ番号が複数回現れた場合は
/// 最初のノートが採用されます。
pub(crate) fn render_note_band(records: &RecordSet, code: &str, band: &Range<i64>) -> String {
    let mut notes: HashMap<i64, &str> = HashMap::new();
    if let Some(params) = records.get(code, RecordKind::Parameter) {
        for record in params {
            if let (Some(number), Some(note)) = (record.number, record.note.as_deref()) {
                notes.entry(number).or_insert(note);
            }
        }
    }

    let mut out = String::new();
    let _ = writeln!(out, "[{}]", code.to_uppercase());

    for number in band.clone() {
        let joined = notes
            .get(&number)
            .map(|note| join_note_lines(note))
            .unwrap_or_default();
        let _ = writeln!(out, "HILFEPARAM{}={}", number, joined);
    }

    out
}

/// 値のリストを1行1値のテキストに描画する
///
/// 機械構成（`mps3.ini`）、HMI構成、言語構成ファイルに使用します。
pub(crate) fn render_value_list(values: &[String]) -> String {
    let mut out = String::new();
    for value in values {
        out.push_str(value);
        out.push('\n');
    }
    out
}

/// 複数行ノートをデリミタで1行に畳み込む
fn join_note_lines(note: &str) -> String {
    note.lines().collect::<Vec<_>>().join(NOTE_DELIMITER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Record, RecordKind, RecordSet};

    fn sample_records() -> RecordSet {
        let mut records = RecordSet::new();
        records.push(
            "deutsch",
            RecordKind::Parameter,
            Record {
                key: "100".to_string(),
                number: Some(100),
                text: "Drehzahl".to_string(),
                note: Some("Zeile 1\nZeile 2".to_string()),
            },
        );
        records.push(
            "deutsch",
            RecordKind::Parameter,
            Record {
                key: "101".to_string(),
                number: Some(101),
                text: "Drehmoment".to_string(),
                note: None,
            },
        );
        records.push(
            "deutsch",
            RecordKind::Category,
            Record::indexed(0, "Basis".to_string()),
        );
        records
    }

    #[test]
    fn test_language_file_header_and_sections() {
        let text = render_language_file(&sample_records(), "deutsch");

        assert!(text.starts_with("[deutsch]\n"));
        assert!(text.contains("//Parametertexte\nPARAM100=Drehzahl\nPARAM101=Drehmoment\n\n"));
        assert!(text.contains("//Texte Tabelle/Registerkarte\nTAB0=Basis\n\n"));
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let text = render_language_file(&sample_records(), "deutsch");

        // メニューやエラーメッセージのレコードは無いのでセクションごと消える
        assert!(!text.contains("MENU"));
        assert!(!text.contains("ERROR"));
    }

    #[test]
    fn test_sections_follow_fixed_order() {
        let text = render_language_file(&sample_records(), "deutsch");
        let param_pos = text.find("PARAM100").unwrap();
        let tab_pos = text.find("TAB0").unwrap();
        assert!(param_pos < tab_pos);
    }

    #[test]
    fn test_note_band_joins_lines_with_delimiter() {
        let text = render_note_band(&sample_records(), "deutsch", &(100..103));

        assert!(text.starts_with("[DEUTSCH]\n"));
        assert!(text.contains("HILFEPARAM100=Zeile 1§§Zeile 2\n"));
        // ノートの無い番号は空の値
        assert!(text.contains("HILFEPARAM101=\n"));
        assert!(text.contains("HILFEPARAM102=\n"));
    }

    #[test]
    fn test_note_band_covers_whole_band() {
        let text = render_note_band(&sample_records(), "deutsch", &(0..200));
        assert_eq!(text.lines().count(), 201);
    }

    #[test]
    fn test_note_band_first_note_wins() {
        let mut records = sample_records();
        records.push(
            "deutsch",
            RecordKind::Parameter,
            Record {
                key: "100".to_string(),
                number: Some(100),
                text: "Duplikat".to_string(),
                note: Some("spaeter".to_string()),
            },
        );

        let text = render_note_band(&records, "deutsch", &(100..101));
        assert!(text.contains("HILFEPARAM100=Zeile 1§§Zeile 2\n"));
    }

    #[test]
    fn test_value_list_one_per_line() {
        let values = vec!["a".to_string(), "42".to_string()];
        assert_eq!(render_value_list(&values), "a\n42\n");
        assert_eq!(render_value_list(&[]), "");
    }
}
