//! Record Model Module
//!
//! 抽出されたエンティティの型付きレコード表現を定義するモジュール。
//! レコード種別ごとのキータグ・セクションコメント・既定ブロック長は
//! ここの定数テーブルに集約され、汎用の抽出・レンダリングパイプラインから
//! 参照されます（種別ごとのコードパスは存在しません）。

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// 抽出されるレコードの種別
///
/// 各種別は固定のキータグ（例: `PARAM`）、セクションコメント行、
/// および既定のブロック長を持ちます。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    /// 機械パラメータのテキスト（`PARAM<番号>=<名前>`）
    Parameter,
    /// テーブル/タブのテキスト
    Category,
    /// 列見出しのテキスト
    Header,
    /// メニューのテキスト
    Menu,
    /// システムメッセージのテキスト
    SystemMessage,
    /// エラーメッセージのテキスト
    ErrorMessage,
    /// HMIタブのテキスト（任意シート由来、旧版のワークブックには存在しない）
    HmiCategory,
    /// 言語構成ファイルの1行
    LanguageConfigEntry,
    /// ページ/画面名の1行
    IoName,
    /// IOメッセージ（`IO_<n>=<テキスト>`）
    IoMessage,
}

impl RecordKind {
    /// 言語ファイル内のセクション出力順（固定）
    pub const LNG_SECTION_ORDER: [RecordKind; 7] = [
        RecordKind::Parameter,
        RecordKind::Category,
        RecordKind::Header,
        RecordKind::Menu,
        RecordKind::SystemMessage,
        RecordKind::ErrorMessage,
        RecordKind::HmiCategory,
    ];

    /// キー行の接頭辞タグ
    ///
    /// リスト形式でのみ出力される種別は空文字列を返します。
    pub fn key_tag(self) -> &'static str {
        match self {
            RecordKind::Parameter => "PARAM",
            RecordKind::Category => "TAB",
            RecordKind::Header => "COL",
            RecordKind::Menu => "MENU",
            RecordKind::SystemMessage => "SYSTEM",
            RecordKind::ErrorMessage => "ERROR",
            RecordKind::HmiCategory => "TABHMI",
            RecordKind::IoMessage => "IO_",
            RecordKind::LanguageConfigEntry | RecordKind::IoName => "",
        }
    }

    /// セクションの先頭に書き出されるコメント行
    pub fn section_comment(self) -> &'static str {
        match self {
            RecordKind::Parameter => "//Parametertexte",
            RecordKind::Category => "//Texte Tabelle/Registerkarte",
            RecordKind::Header => "//Überschriften Spalten",
            RecordKind::Menu => "//MenüTexte",
            RecordKind::SystemMessage => {
                "//Systemtexte(Beschriftungen, Überschriften, usw.)"
            }
            RecordKind::ErrorMessage => "//Fehlertexte",
            RecordKind::HmiCategory => "//Texte Registerkarte HMI",
            RecordKind::LanguageConfigEntry
            | RecordKind::IoName
            | RecordKind::IoMessage => "",
        }
    }

    /// マスターレイアウト上の既定のブロック長
    ///
    /// 「シート末尾まで読む」種別には既定長がありません（`None`）。
    pub fn default_len(self) -> Option<u32> {
        match self {
            RecordKind::Parameter => Some(1300),
            RecordKind::Category => Some(20),
            RecordKind::Header => Some(10),
            RecordKind::Menu => Some(30),
            RecordKind::SystemMessage => Some(50),
            RecordKind::ErrorMessage => Some(20),
            RecordKind::HmiCategory => Some(30),
            RecordKind::LanguageConfigEntry
            | RecordKind::IoName
            | RecordKind::IoMessage => None,
        }
    }
}

/// 抽出された1件のレコード
///
/// `key`は正規化済みの数値キー（パラメータ番号、またはブロック先頭行からの
/// 0始まりオフセット）、`number`はキーが整数である場合の整数値です。
/// レコードは構築後に変更されません。
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// キータグの直後に出力される正規化済みキー
    pub key: String,
    /// キーが整数の場合の整数値（ノートのバンド照合に使用）
    pub number: Option<i64>,
    /// 表示テキスト
    pub text: String,
    /// セルノート由来の複数行テキスト（改行を保持、Parameterのみ）
    pub note: Option<String>,
}

impl Record {
    /// ブロック先頭行からのオフセットをキーとするレコードを生成
    pub(crate) fn indexed(index: i64, text: String) -> Self {
        Self {
            key: index.to_string(),
            number: Some(index),
            text,
            note: None,
        }
    }
}

/// (言語コード, レコード種別) からレコード列への写像
///
/// 挿入順 = 行順であり、出力時にもその順序が保持されます。
/// 実行ごとに新しいインスタンスが構築され、構築後は変更されません。
#[derive(Debug, Default)]
pub struct RecordSet {
    records: HashMap<(String, RecordKind), Vec<Record>>,
}

impl RecordSet {
    /// 空のRecordSetを生成
    pub fn new() -> Self {
        Self::default()
    }

    /// レコードを末尾に追加（構築時のみ使用）
    pub(crate) fn push(&mut self, language: &str, kind: RecordKind, record: Record) {
        self.records
            .entry((language.to_string(), kind))
            .or_default()
            .push(record);
    }

    /// 指定した言語・種別のレコード列を取得
    ///
    /// 任意シートの欠落などでその種別が抽出されなかった場合は`None`を返します。
    pub fn get(&self, language: &str, kind: RecordKind) -> Option<&[Record]> {
        self.records
            .get(&(language.to_string(), kind))
            .map(Vec::as_slice)
    }

    /// 格納されている (言語, 種別) エントリ数
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// エントリが1つも無いかどうか
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
