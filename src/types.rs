//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。
//! セル値の表現と、数値の正規化ルールをここに集約する。

/// セルの値を表す列挙型
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CellValue {
    /// 数値（Excelはすべての数値を浮動小数点として保持する）
    Number(f64),

    /// 文字列
    Text(String),

    /// 論理値
    Bool(bool),

    /// 空セル
    Empty,
}

impl CellValue {
    /// 値が空かどうかを判定
    ///
    /// 空セルに加えて、空文字列のセルも空として扱います。
    /// 空セルは連続ブロックの抽出を終端させます。
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// 値を正規化された文字列として取得
    ///
    /// 数値セルで値が整数と等しい場合は整数表記（`12.0 -> "12"`）を返し、
    /// それ以外の値は変更せずにそのまま文字列化します（`12.5 -> "12.5"`）。
    /// パラメータ番号などの整数識別子が出力ファイルに小数表記で
    /// 混入するのを防ぎます。正規化は冪等です。
    pub fn to_normalized_string(&self) -> String {
        match self {
            CellValue::Number(n) => match whole_number(*n) {
                Some(i) => i.to_string(),
                None => n.to_string(),
            },
            CellValue::Text(s) => s.clone(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Empty => String::new(),
        }
    }

    /// 整数と等しい数値セルの場合、その整数値を取得
    ///
    /// パラメータ番号の照合や、ワークブック内のセルから読み取る
    /// 行範囲の境界値（1始まり）の解釈に使用します。
    pub fn as_whole_number(&self) -> Option<i64> {
        match self {
            CellValue::Number(n) => whole_number(*n),
            _ => None,
        }
    }
}

/// 浮動小数点値が整数と等しい場合にその整数を返す
fn whole_number(n: f64) -> Option<i64> {
    if n.is_finite() && n.trunc() == n && n.abs() < i64::MAX as f64 {
        Some(n as i64)
    } else {
        None
    }
}
