//! Extraction Plan Module
//!
//! ワークブックのどのシート・列・行範囲からどの種別のレコードを
//! 抽出するかを記述する構成データを定義するモジュール。
//! 言語や列インデックスの対応表はコードではなくデータとして保持し、
//! serdeによりJSONファイルから差し替え可能です（ワークブックの版ごとの
//! レイアウト差異はプランの差し替えで吸収します）。

use std::io::Read;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::XlSetupError;
use crate::record::RecordKind;

/// 連続範囲の抽出を終了させる規則
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopPolicy {
    /// 固定長ブロック: 最大`n`行（シート末尾と最初の空セルで打ち切り）
    FixedCount(u32),
    /// 論理長が未知の列: シート末尾まで、最初の空セルで打ち切り
    FirstBlank,
}

/// 1つの連続セル範囲の指定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRange {
    /// シートインデックス（0始まり）
    pub sheet: usize,
    /// 列インデックス（0始まり）
    pub column: u32,
    /// 開始行（0始まり）
    pub start_row: u32,
    /// 終了規則
    pub stop: StopPolicy,
}

/// マスターレイアウト上の固定長ブロックの指定
///
/// ブロックの行範囲はすべての言語シートで共通（マスターレイアウト）であり、
/// 表示テキストのみ言語シートごとに読み取られます。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSpec {
    /// レコード種別
    pub kind: RecordKind,
    /// ブロックの開始行（0始まり）
    pub start_row: u32,
    /// ブロックの最大長
    pub len: u32,
}

/// セットアップ抽出での言語とシートの対応
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupLanguage {
    /// 言語コード（出力ファイル名に使用、例: `deutsch`）
    pub code: String,
    /// その言語の翻訳テキストを保持するシートのインデックス
    pub sheet_index: usize,
}

/// 翻訳抽出での言語とシート・列の対応
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageSpec {
    /// 言語コード（例: `de`）
    pub code: String,
    /// その言語の翻訳テキストを保持するシートのインデックス
    pub sheet_index: usize,
    /// ページ/画面名シート内のその言語の列
    pub io_column: u32,
    /// IOメッセージシート内のその言語の列
    pub io_message_column: u32,
}

impl LanguageSpec {
    /// 言語リスト内の位置`index`から標準レイアウトの対応を導出
    ///
    /// シートは`3 + index`、ページ名列は`1 + index`、
    /// IOメッセージ列は`3 + index`という固定の配置に従います。
    pub fn numbered(code: &str, index: usize) -> Self {
        Self {
            code: code.to_string(),
            sheet_index: 3 + index,
            io_column: 1 + index as u32,
            io_message_column: 3 + index as u32,
        }
    }
}

/// 翻訳抽出の標準言語コード一覧（シート順）
pub const TRANSLATION_LANGUAGES: [&str; 26] = [
    "de", "en", "fr", "es", "it", "nl", "no", "ja", "pt", "fi", "hu", "sk", "cs",
    "sv", "pl", "ro", "da", "sl", "tr", "et", "hr", "ru", "el", "lt", "bg", "zh",
];

/// セットアップ抽出（固定長ブロックモード）のプラン
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetupPlan {
    /// 抽出対象の言語（宣言順に処理される）
    pub languages: Vec<SetupLanguage>,
    /// パラメータブロックの開始行
    pub start_row: u32,
    /// パラメータブロックの最大長
    pub param_count: u32,
    /// 表示テキストの列
    pub name_column: u32,
    /// パラメータ番号の列
    pub number_column: u32,
    /// マスターレイアウト上の固定長ブロック（カテゴリ、見出しなど）
    pub blocks: Vec<BlockSpec>,
    /// 機械構成ファイルの範囲（必須シート）
    pub machine_config: ExtractionRange,
    /// HMI構成ファイルの範囲（任意シート: 欠落はエラーではない）
    pub hmi_config: ExtractionRange,
    /// ノート/説明ファイルのパラメータ番号バンド（3分割）
    pub note_bands: Vec<Range<i64>>,
}

impl Default for SetupPlan {
    fn default() -> Self {
        let block = |kind: RecordKind, start_row: u32| BlockSpec {
            kind,
            start_row,
            // 既定長テーブルに無い種別はここには現れない
            len: kind.default_len().unwrap_or(0),
        };

        Self {
            languages: vec![
                SetupLanguage {
                    code: "deutsch".to_string(),
                    sheet_index: 1,
                },
                SetupLanguage {
                    code: "english".to_string(),
                    sheet_index: 2,
                },
            ],
            start_row: 9,
            param_count: 1300,
            name_column: 0,
            number_column: 1,
            blocks: vec![
                block(RecordKind::HmiCategory, 1319),
                block(RecordKind::Category, 1349),
                block(RecordKind::Header, 1369),
                block(RecordKind::Menu, 1379),
                block(RecordKind::SystemMessage, 1409),
                block(RecordKind::ErrorMessage, 1459),
            ],
            machine_config: ExtractionRange {
                sheet: 3, // 'ini903'
                column: 0,
                start_row: 9,
                stop: StopPolicy::FirstBlank,
            },
            hmi_config: ExtractionRange {
                sheet: 4, // 'iniHMI'（旧版のワークブックには存在しない）
                column: 0,
                start_row: 9,
                stop: StopPolicy::FirstBlank,
            },
            note_bands: vec![0..200, 200..600, 600..1300],
        }
    }
}

/// 翻訳抽出（セクション駆動モード）のプラン
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationPlan {
    /// 抽出対象の言語（宣言順に処理され、`touchNN.ini`の番号を決める）
    pub languages: Vec<LanguageSpec>,
    /// データ走査の開始行
    pub start_row: u32,
    /// セクションマーカーとキー接頭辞を保持するレイアウトシート
    ///
    /// セクションとキーの定義が信頼できるのは基準言語のシートだけなので、
    /// すべての言語でこの1枚を参照します。
    pub layout_sheet: usize,
    /// セクションマーカー（`[`で始まるセル）の列
    pub section_column: u32,
    /// キー接頭辞の列（新しいセクションの開始行でのみ読み取られる）
    pub key_column: u32,
    /// 翻訳テキストの列（言語シート側）
    pub text_column: u32,
    /// 走査から除外する行範囲
    ///
    /// ワークブックの版に固有の重複行の読み飛ばしです。版ごとに異なるため
    /// 構成パラメータであり、不要な場合は`None`にします。
    pub excluded_rows: Option<Range<u32>>,
    /// ページ/画面名を保持するシート
    pub page_sheet: usize,
    /// ページ名範囲の開始行を保持するセル（1始まりの値が入っている）
    pub page_start_cell: (u32, u32),
    /// ページ名範囲の終了行を保持するセル
    pub page_end_cell: (u32, u32),
    /// IOメッセージを保持するシート
    pub io_message_sheet: usize,
    /// IOメッセージの開始行（シート末尾まで読む）
    pub io_message_start_row: u32,
    /// 言語構成ファイルの第1ブロック
    pub language_config_primary: ExtractionRange,
    /// 言語構成ファイルに追記される第2ブロック（I列）
    pub language_config_secondary: ExtractionRange,
}

impl Default for TranslationPlan {
    fn default() -> Self {
        Self {
            languages: TRANSLATION_LANGUAGES
                .iter()
                .enumerate()
                .map(|(i, code)| LanguageSpec::numbered(code, i))
                .collect(),
            start_row: 9,
            layout_sheet: 3, // 'de'
            section_column: 1,
            key_column: 2,
            text_column: 0,
            excluded_rows: Some(3899..4499),
            page_sheet: 2, // 'Seitendefinitionen'
            page_start_cell: (9, 0),
            page_end_cell: (10, 0),
            io_message_sheet: 0, // 'EATexte'
            io_message_start_row: 39,
            language_config_primary: ExtractionRange {
                sheet: 1, // 'lng903'
                column: 0,
                start_row: 9,
                stop: StopPolicy::FirstBlank,
            },
            language_config_secondary: ExtractionRange {
                sheet: 1,
                column: 8, // 'I'
                start_row: 9,
                stop: StopPolicy::FirstBlank,
            },
        }
    }
}

/// ドキュメント1種ぶんの抽出構成（両パイプラインのプラン）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionPlan {
    /// セットアップ抽出のプラン
    pub setup: SetupPlan,
    /// 翻訳抽出のプラン
    pub translation: TranslationPlan,
}

impl ExtractionPlan {
    /// JSON文字列からプランを読み込む
    pub fn from_json_str(json: &str) -> Result<Self, XlSetupError> {
        serde_json::from_str(json)
            .map_err(|e| XlSetupError::Config(format!("Invalid extraction plan: {}", e)))
    }

    /// リーダーからJSON形式のプランを読み込む
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, XlSetupError> {
        serde_json::from_reader(reader)
            .map_err(|e| XlSetupError::Config(format!("Invalid extraction plan: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_setup_plan_layout() {
        let plan = SetupPlan::default();

        assert_eq!(plan.languages.len(), 2);
        assert_eq!(plan.languages[0].code, "deutsch");
        assert_eq!(plan.languages[0].sheet_index, 1);
        assert_eq!(plan.start_row, 9);
        assert_eq!(plan.param_count, 1300);

        // ブロックはマスターレイアウトの行配置に従う
        let category = plan
            .blocks
            .iter()
            .find(|b| b.kind == RecordKind::Category)
            .unwrap();
        assert_eq!(category.start_row, 1349);
        assert_eq!(category.len, 20);

        assert_eq!(plan.machine_config.sheet, 3);
        assert_eq!(plan.hmi_config.sheet, 4);
        assert_eq!(plan.note_bands, vec![0..200, 200..600, 600..1300]);
    }

    #[test]
    fn test_default_translation_plan_layout() {
        let plan = TranslationPlan::default();

        assert_eq!(plan.languages.len(), 26);
        assert_eq!(plan.languages[0].code, "de");
        assert_eq!(plan.languages[0].sheet_index, 3);
        assert_eq!(plan.languages[25].code, "zh");
        assert_eq!(plan.languages[25].sheet_index, 28);

        // 言語ごとの列は言語リスト内の位置から導出される
        assert_eq!(plan.languages[1].io_column, 2);
        assert_eq!(plan.languages[1].io_message_column, 4);

        assert_eq!(plan.excluded_rows, Some(3899..4499));
        assert_eq!(plan.language_config_secondary.column, 8);
    }

    #[test]
    fn test_plan_json_round_trip() {
        let plan = ExtractionPlan::default();
        let json = serde_json::to_string(&plan).unwrap();
        let parsed = ExtractionPlan::from_json_str(&json).unwrap();
        assert_eq!(parsed, plan);
    }

    #[test]
    fn test_plan_from_invalid_json() {
        let result = ExtractionPlan::from_json_str("{ not json");
        assert!(matches!(result, Err(XlSetupError::Config(_))));
    }

    #[test]
    fn test_language_spec_numbered() {
        let spec = LanguageSpec::numbered("fr", 2);
        assert_eq!(spec.code, "fr");
        assert_eq!(spec.sheet_index, 5);
        assert_eq!(spec.io_column, 3);
        assert_eq!(spec.io_message_column, 5);
    }
}
