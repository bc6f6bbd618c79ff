//! Workbook Source Module
//!
//! calamineを使用したワークブック読み取りの実装。
//! ワークブックは実行ごとに1回だけ開かれ、読み取り専用で使用されます。

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use std::io::{Cursor, Read, Seek};

use crate::error::XlSetupError;
use crate::security::SecurityConfig;
use crate::source::notes::NoteCatalog;
use crate::source::CellSource;
use crate::types::CellValue;

/// calamineベースのワークブックアダプタ
///
/// すべてのシート範囲を先読みして保持し、セルノートは
/// XLSX内部のXML（calamineで取得不可能な情報）から別途取得します。
pub(crate) struct WorkbookSource {
    /// シート範囲（位置インデックス順）
    sheets: Vec<Range<Data>>,
    /// セルノートのカタログ
    notes: NoteCatalog,
}

impl WorkbookSource {
    /// ワークブックを開く
    ///
    /// # 引数
    ///
    /// * `reader` - ワークブックを読み込むためのリーダー（Read + Seekトレイトを実装）
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookSource)` - ワークブックの読み込みに成功した場合（XLSX形式のみサポート）
    /// * `Err(XlSetupError)` - 読み込みまたは解析に失敗した場合
    pub fn open<R: Read + Seek>(mut reader: R) -> Result<Self, XlSetupError> {
        let security_config = SecurityConfig::default();

        // ノート解析とcalamineの両方で使うため、ファイル全体をメモリに読み込む
        // セキュリティ: ファイルサイズ制限を適用
        let mut buffer = Vec::new();
        let bytes_read = reader.read_to_end(&mut buffer)?;

        if bytes_read as u64 > security_config.max_input_file_size {
            return Err(XlSetupError::SecurityViolation(format!(
                "Input file size exceeds maximum: {} bytes (max: {} bytes)",
                bytes_read, security_config.max_input_file_size
            )));
        }

        // calamineでワークブックを開く
        let sheets = open_workbook_auto_from_rs(Cursor::new(buffer.clone()))
            .map_err(XlSetupError::Parse)?;
        let mut workbook = match sheets {
            Sheets::Xlsx(workbook) => workbook,
            _ => {
                return Err(XlSetupError::Config(
                    "Only XLSX format is supported".to_string(),
                ))
            }
        };

        // シート範囲を位置インデックス順に先読みする
        let sheet_count = workbook.sheet_names().len();
        let mut ranges = Vec::with_capacity(sheet_count);
        for index in 0..sheet_count {
            let range = workbook
                .worksheet_range_at(index)
                .ok_or_else(|| {
                    XlSetupError::Config(format!("Sheet {} is not readable", index))
                })?
                .map_err(|e| XlSetupError::Parse(e.into()))?;
            ranges.push(range);
        }

        // セルノートをXLSX内部のXMLから取得
        let notes = NoteCatalog::parse(Cursor::new(buffer))?;

        Ok(Self {
            sheets: ranges,
            notes,
        })
    }
}

impl CellSource for WorkbookSource {
    fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    fn row_count(&self, sheet: usize) -> u32 {
        self.sheets
            .get(sheet)
            .and_then(|range| range.end())
            .map(|(row, _)| row + 1)
            .unwrap_or(0)
    }

    fn cell(&self, sheet: usize, row: u32, col: u32) -> CellValue {
        let data = self
            .sheets
            .get(sheet)
            .and_then(|range| range.get_value((row, col)));

        match data {
            Some(Data::Float(f)) => CellValue::Number(*f),
            Some(Data::Int(i)) => CellValue::Number(*i as f64),
            Some(Data::String(s)) => CellValue::Text(s.clone()),
            Some(Data::Bool(b)) => CellValue::Bool(*b),
            Some(Data::DateTime(dt)) => CellValue::Number(dt.as_f64()),
            Some(Data::DateTimeIso(s)) | Some(Data::DurationIso(s)) => {
                CellValue::Text(s.clone())
            }
            // エラーセルは空として扱う（ブロックの終端として振る舞う）
            Some(Data::Error(_)) | Some(Data::Empty) | None => CellValue::Empty,
        }
    }

    fn note(&self, sheet: usize, row: u32, col: u32) -> Option<&str> {
        self.notes.get(sheet, row, col)
    }
}
