//! Extraction Module
//!
//! 連続セル範囲の読み取りプリミティブと、セットアップ抽出の
//! アグリゲータを実装するモジュール。
//! 「空セルがブロックを終端する」規則はこのモジュールの
//! `extract_range`にのみ存在し、すべてのレコード種別で共有されます。

use crate::error::XlSetupError;
use crate::plan::{ExtractionRange, SetupPlan, StopPolicy};
use crate::record::{Record, RecordKind, RecordSet};
use crate::source::CellSource;
use crate::types::CellValue;

/// 連続範囲から (行, 値) の列を抽出する
///
/// * `FixedCount(n)` - `[start_row, start_row + n)` をシート行数で切り詰めて走査する
/// * `FirstBlank` - `[start_row, 行数)` を走査する
///
/// どちらの規則でも、最初の空セルで打ち切ります（その行自体は含まない）。
/// `start_row`がシート行数以上の場合は空の列を返します（エラーではない）。
pub(crate) fn extract_range<S: CellSource + ?Sized>(
    source: &S,
    range: &ExtractionRange,
) -> Vec<(u32, CellValue)> {
    let row_count = source.row_count(range.sheet);
    let end = match range.stop {
        StopPolicy::FixedCount(n) => row_count.min(range.start_row.saturating_add(n)),
        StopPolicy::FirstBlank => row_count,
    };

    let mut values = Vec::new();
    for row in range.start_row..end {
        let value = source.cell(range.sheet, row, range.column);
        if value.is_empty() {
            break;
        }
        values.push((row, value));
    }
    values
}

/// 連続範囲を正規化済み文字列のリストとして抽出する
///
/// 機械構成・言語構成などの行リストファイルに使用します。
pub(crate) fn extract_values<S: CellSource + ?Sized>(
    source: &S,
    range: &ExtractionRange,
) -> Vec<String> {
    extract_range(source, range)
        .into_iter()
        .map(|(_, value)| value.to_normalized_string())
        .collect()
}

/// セットアップ抽出のアグリゲータ
///
/// プランに従って各言語シートからパラメータと固定長ブロックを抽出し、
/// 新しく構築した`RecordSet`を返します。
///
/// # 失敗の扱い
///
/// 言語シートの欠落は構成エラーとして致命的に扱います。
/// ブロックが空である（先頭セルが空）ことはエラーではなく、
/// その種別のエントリが単に存在しない結果になります。
pub(crate) fn collect_setup_records<S: CellSource>(
    source: &S,
    plan: &SetupPlan,
) -> Result<RecordSet, XlSetupError> {
    let mut records = RecordSet::new();

    for language in &plan.languages {
        if !source.has_sheet(language.sheet_index) {
            return Err(XlSetupError::Config(format!(
                "Language sheet {} for '{}' is missing from the workbook",
                language.sheet_index, language.code
            )));
        }

        // 1. パラメータブロック（番号セルとノートを伴う）
        let param_range = ExtractionRange {
            sheet: language.sheet_index,
            column: plan.name_column,
            start_row: plan.start_row,
            stop: StopPolicy::FixedCount(plan.param_count),
        };
        for (row, name) in extract_range(source, &param_range) {
            // パラメータ番号を整数として抽出する（Excelは浮動小数点しか知らない）
            let number_cell = source.cell(language.sheet_index, row, plan.number_column);
            let note = source
                .note(language.sheet_index, row, plan.name_column)
                .map(str::to_owned);

            records.push(
                &language.code,
                RecordKind::Parameter,
                Record {
                    key: number_cell.to_normalized_string(),
                    number: number_cell.as_whole_number(),
                    text: name.to_normalized_string(),
                    note,
                },
            );
        }

        // 2. マスターレイアウト上の固定長ブロック
        //    インデックスはブロック先頭行からのオフセット（常に0始まり）
        for block in &plan.blocks {
            let block_range = ExtractionRange {
                sheet: language.sheet_index,
                column: plan.name_column,
                start_row: block.start_row,
                stop: StopPolicy::FixedCount(block.len),
            };
            for (row, value) in extract_range(source, &block_range) {
                let index = i64::from(row - block.start_row);
                records.push(
                    &language.code,
                    block.kind,
                    Record::indexed(index, value.to_normalized_string()),
                );
            }
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{BlockSpec, SetupLanguage};
    use std::collections::HashMap;

    /// テスト用のメモリ内セルソース
    #[derive(Default)]
    struct GridSource {
        sheets: Vec<HashMap<(u32, u32), CellValue>>,
        row_counts: Vec<u32>,
        notes: HashMap<(usize, u32, u32), String>,
    }

    impl GridSource {
        fn with_sheets(count: usize, rows: u32) -> Self {
            Self {
                sheets: (0..count).map(|_| HashMap::new()).collect(),
                row_counts: vec![rows; count],
                notes: HashMap::new(),
            }
        }

        fn set_text(&mut self, sheet: usize, row: u32, col: u32, text: &str) {
            self.sheets[sheet].insert((row, col), CellValue::Text(text.to_string()));
        }

        fn set_number(&mut self, sheet: usize, row: u32, col: u32, n: f64) {
            self.sheets[sheet].insert((row, col), CellValue::Number(n));
        }

        fn set_note(&mut self, sheet: usize, row: u32, col: u32, note: &str) {
            self.notes.insert((sheet, row, col), note.to_string());
        }
    }

    impl CellSource for GridSource {
        fn sheet_count(&self) -> usize {
            self.sheets.len()
        }

        fn row_count(&self, sheet: usize) -> u32 {
            self.row_counts.get(sheet).copied().unwrap_or(0)
        }

        fn cell(&self, sheet: usize, row: u32, col: u32) -> CellValue {
            self.sheets
                .get(sheet)
                .and_then(|cells| cells.get(&(row, col)))
                .cloned()
                .unwrap_or(CellValue::Empty)
        }

        fn note(&self, sheet: usize, row: u32, col: u32) -> Option<&str> {
            self.notes.get(&(sheet, row, col)).map(String::as_str)
        }
    }

    fn fixed(sheet: usize, column: u32, start_row: u32, n: u32) -> ExtractionRange {
        ExtractionRange {
            sheet,
            column,
            start_row,
            stop: StopPolicy::FixedCount(n),
        }
    }

    fn first_blank(sheet: usize, column: u32, start_row: u32) -> ExtractionRange {
        ExtractionRange {
            sheet,
            column,
            start_row,
            stop: StopPolicy::FirstBlank,
        }
    }

    #[test]
    fn test_fixed_count_stops_at_first_blank() {
        let mut source = GridSource::with_sheets(1, 100);
        // 行9..29のウィンドウにデータは5件だけ（オフセット5が空）
        for i in 0..5 {
            source.set_text(0, 9 + i, 0, &format!("V{}", i));
        }

        let values = extract_range(&source, &fixed(0, 0, 9, 20));
        assert_eq!(values.len(), 5);
        assert_eq!(values[0].0, 9);
        assert_eq!(values[4].0, 13);
    }

    #[test]
    fn test_fixed_count_is_clipped_to_row_count() {
        let mut source = GridSource::with_sheets(1, 12);
        for row in 9..12 {
            source.set_text(0, row, 0, "x");
        }

        // ウィンドウは20行だがシートは12行しかない
        let values = extract_range(&source, &fixed(0, 0, 9, 20));
        assert_eq!(values.len(), 3);
    }

    #[test]
    fn test_first_blank_runs_to_sheet_end() {
        let mut source = GridSource::with_sheets(1, 15);
        for row in 9..15 {
            source.set_text(0, row, 0, "x");
        }

        let values = extract_range(&source, &first_blank(0, 0, 9));
        assert_eq!(values.len(), 6);
    }

    #[test]
    fn test_first_blank_stops_at_embedded_blank() {
        let mut source = GridSource::with_sheets(1, 20);
        source.set_text(0, 9, 0, "a");
        source.set_text(0, 10, 0, "b");
        // 行11は空、行12に再びデータがあっても含まれない
        source.set_text(0, 12, 0, "c");

        let values = extract_range(&source, &first_blank(0, 0, 9));
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_start_row_beyond_sheet_is_empty() {
        let source = GridSource::with_sheets(1, 5);
        assert!(extract_range(&source, &fixed(0, 0, 9, 20)).is_empty());
        assert!(extract_range(&source, &first_blank(0, 0, 9)).is_empty());
    }

    #[test]
    fn test_extract_values_normalizes_numbers() {
        let mut source = GridSource::with_sheets(1, 20);
        source.set_number(0, 9, 0, 42.0);
        source.set_text(0, 10, 0, "text");

        let values = extract_values(&source, &first_blank(0, 0, 9));
        assert_eq!(values, vec!["42".to_string(), "text".to_string()]);
    }

    fn small_plan() -> SetupPlan {
        SetupPlan {
            languages: vec![SetupLanguage {
                code: "deutsch".to_string(),
                sheet_index: 0,
            }],
            start_row: 9,
            param_count: 10,
            name_column: 0,
            number_column: 1,
            blocks: vec![BlockSpec {
                kind: RecordKind::Category,
                start_row: 30,
                len: 20,
            }],
            ..SetupPlan::default()
        }
    }

    #[test]
    fn test_collect_parameters_with_numbers_and_notes() {
        let mut source = GridSource::with_sheets(1, 100);
        source.set_text(0, 9, 0, "Speed");
        source.set_number(0, 9, 1, 100.0);
        source.set_note(0, 9, 0, "Zeile 1\nZeile 2");
        source.set_text(0, 10, 0, "Torque");
        source.set_number(0, 10, 1, 101.0);

        let records = collect_setup_records(&source, &small_plan()).unwrap();
        let params = records.get("deutsch", RecordKind::Parameter).unwrap();

        assert_eq!(params.len(), 2);
        assert_eq!(params[0].key, "100");
        assert_eq!(params[0].number, Some(100));
        assert_eq!(params[0].text, "Speed");
        assert_eq!(params[0].note.as_deref(), Some("Zeile 1\nZeile 2"));
        assert_eq!(params[1].key, "101");
        assert!(params[1].note.is_none());
    }

    #[test]
    fn test_block_indices_are_zero_based_offsets() {
        let mut source = GridSource::with_sheets(1, 100);
        source.set_text(0, 9, 0, "P");
        source.set_number(0, 9, 1, 1.0);
        // カテゴリは20行のウィンドウにデータ3件のみ
        source.set_text(0, 30, 0, "Basis");
        source.set_text(0, 31, 0, "Antrieb");
        source.set_text(0, 32, 0, "Service");

        let records = collect_setup_records(&source, &small_plan()).unwrap();
        let categories = records.get("deutsch", RecordKind::Category).unwrap();

        assert_eq!(categories.len(), 3);
        assert_eq!(categories[0].key, "0");
        assert_eq!(categories[1].key, "1");
        assert_eq!(categories[2].key, "2");
        assert_eq!(categories[0].text, "Basis");
    }

    #[test]
    fn test_missing_language_sheet_is_fatal() {
        let source = GridSource::with_sheets(0, 0);
        let result = collect_setup_records(&source, &small_plan());
        assert!(matches!(result, Err(XlSetupError::Config(_))));
    }

    #[test]
    fn test_fractional_parameter_number_passes_through() {
        let mut source = GridSource::with_sheets(1, 100);
        source.set_text(0, 9, 0, "Odd");
        source.set_number(0, 9, 1, 12.5);

        let records = collect_setup_records(&source, &small_plan()).unwrap();
        let params = records.get("deutsch", RecordKind::Parameter).unwrap();

        // 整数でない番号は変更されずに通過し、バンド照合には使われない
        assert_eq!(params[0].key, "12.5");
        assert_eq!(params[0].number, None);
    }
}
