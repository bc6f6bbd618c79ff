//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use std::path::PathBuf;
use thiserror::Error;

/// xlsetupクレート全体で使用するエラー型
///
/// ワークブックの読み込み、抽出、出力ファイルの書き込み中に発生する
/// すべてのエラーを統一的に扱うために使用されます。
///
/// # エラーの種類
///
/// - `Io`: I/O操作中に発生したエラー（ワークブックの読み込み失敗など）
/// - `Parse`: ワークブックの解析中に発生したエラー（calamine由来）
/// - `Config`: 抽出プランの検証や必須シートの欠落など、構成上のエラー
/// - `WriteFile` / `Encode`: 出力ファイルの書き込み・エンコードに失敗したエラー
///
/// 必須シートの欠落は`Config`として致命的に扱われますが、
/// 任意シート（HMIシートなど）の欠落はエラーではなく空結果として扱われます。
#[derive(Error, Debug)]
pub enum XlSetupError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ワークブックの解析中に発生したエラー
    ///
    /// calamineクレートがExcelファイルを解析する際に発生したエラーです。
    /// ファイル形式が不正、破損したファイルなどが原因となります。
    #[error("Failed to parse Excel workbook: {0}")]
    Parse(#[from] calamine::Error),

    /// UTF-8文字列の変換エラー
    ///
    /// セルノートのXML解析時にUTF-8文字列への変換に失敗した場合に発生します。
    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// ZIPアーカイブの解析エラー
    ///
    /// XLSXファイル（ZIPアーカイブ）の解析中に発生したエラーです。
    #[error("ZIP archive error: {0}")]
    Zip(String),

    /// 数値の解析エラー
    #[error("Number parse error: {0}")]
    ParseInt(#[from] std::num::ParseIntError),

    /// 構成エラー
    ///
    /// 抽出プランの検証に失敗した場合、または必須シート・必須範囲が
    /// ワークブックに存在しない場合に発生します。部分的な出力を
    /// 生成する前に抽出全体を中断します。
    #[error("Configuration error: {0}")]
    Config(String),

    /// セキュリティ制限に違反したエラー
    ///
    /// ZIP bomb攻撃、パストラバーサル攻撃、ファイルサイズ制限などの
    /// セキュリティ制限に違反した場合に発生します。
    #[error("Security violation: {0}")]
    SecurityViolation(String),

    /// 出力ファイルの書き込みに失敗したエラー
    ///
    /// 失敗したファイルのパスを保持します。1つのファイルの書き込み失敗は
    /// 実行全体を中断します（部分的な出力セットは成功状態として扱いません）。
    #[error("Failed to write '{path}': {source}")]
    WriteFile {
        /// 書き込みに失敗した出力ファイルのパス
        path: PathBuf,
        /// 原因となったI/Oエラー
        source: std::io::Error,
    },

    /// 出力テキストが対象エンコーディングで表現できないエラー
    #[error("Output for '{path}' contains characters not representable in {encoding}")]
    Encode {
        /// 対象の出力ファイルのパス
        path: PathBuf,
        /// 対象エンコーディングの名前
        encoding: &'static str,
    },
}
