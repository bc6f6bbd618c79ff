//! Cell Source Module
//!
//! ワークブックへのランダムアクセスを提供する薄いアダプタ層。
//! 抽出パイプラインは`CellSource`トレイトのみに依存し、
//! 実体はcalamineベースの`WorkbookSource`です。

mod notes;
mod workbook;

pub(crate) use workbook::WorkbookSource;

use crate::types::CellValue;

/// セル単位の読み取りインターフェース
///
/// シートは位置でインデックスされます。範囲外のシート・セルへの
/// アクセスはエラーではなく空値を返します（必須シートの検証は
/// 呼び出し側が`has_sheet`で行います）。
pub(crate) trait CellSource {
    /// シート数
    fn sheet_count(&self) -> usize;

    /// 指定シートの行数（使用されている最終行 + 1）
    fn row_count(&self, sheet: usize) -> u32;

    /// セル値の読み取り
    fn cell(&self, sheet: usize, row: u32, col: u32) -> CellValue;

    /// セルノート（注釈）の読み取り
    fn note(&self, sheet: usize, row: u32, col: u32) -> Option<&str>;

    /// シートが存在するかどうか
    fn has_sheet(&self, sheet: usize) -> bool {
        sheet < self.sheet_count()
    }
}
