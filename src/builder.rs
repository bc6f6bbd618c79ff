//! Builder Module
//!
//! 抽出器の構築と、2つの抽出パイプライン（セットアップ抽出・翻訳抽出）の
//! オーケストレーションを実装するモジュール。
//! ビルダーはプランの検証のみを行い、抽出器自体は状態を持ちません。
//! 同じ入力と同じプランに対して、出力はバイト単位で再現可能です。

use std::io::{Read, Seek};
use std::ops::Range;
use std::path::Path;

use crate::error::XlSetupError;
use crate::extract::{collect_setup_records, extract_values};
use crate::output::{
    language_file_name, note_band_file_name, touch_file_name, write_text_file, FileEncoding,
    HMI_CONFIG_FILE, LANGUAGE_CONFIG_FILE, MACHINE_CONFIG_FILE,
};
use crate::plan::{ExtractionPlan, SetupPlan, TranslationPlan};
use crate::record::RecordSet;
use crate::render::{render_language_file, render_note_band, render_value_list};
use crate::section::render_translation;
use crate::source::{CellSource, WorkbookSource};

/// 抽出器のビルダー
///
/// # 使用例
///
/// ```no_run
/// use std::fs::File;
/// use std::path::Path;
/// use xlsetup::ExtractorBuilder;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let extractor = ExtractorBuilder::new().build()?;
/// let input = File::open("setup.xlsx")?;
/// extractor.extract_setup(input, Path::new("out"))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExtractorBuilder {
    plan: ExtractionPlan,
}

impl ExtractorBuilder {
    /// 既定のプラン（現行ワークブックレイアウト）でビルダーを生成
    pub fn new() -> Self {
        Self::default()
    }

    /// プラン全体を差し替える
    pub fn with_plan(mut self, plan: ExtractionPlan) -> Self {
        self.plan = plan;
        self
    }

    /// セットアップ抽出のプランを差し替える
    pub fn with_setup_plan(mut self, setup: SetupPlan) -> Self {
        self.plan.setup = setup;
        self
    }

    /// 翻訳抽出のプランを差し替える
    pub fn with_translation_plan(mut self, translation: TranslationPlan) -> Self {
        self.plan.translation = translation;
        self
    }

    /// 翻訳抽出の除外行範囲を設定する（`None`で除外なし）
    pub fn with_excluded_rows(mut self, excluded_rows: Option<Range<u32>>) -> Self {
        self.plan.translation.excluded_rows = excluded_rows;
        self
    }

    /// プランを検証して抽出器を構築する
    ///
    /// # 戻り値
    ///
    /// * `Ok(Extractor)` - プランが整合している場合
    /// * `Err(XlSetupError::Config)` - 言語が空、ブロック長が0などの場合
    pub fn build(self) -> Result<Extractor, XlSetupError> {
        let setup = &self.plan.setup;
        if setup.languages.is_empty() {
            return Err(XlSetupError::Config(
                "Setup plan must declare at least one language".to_string(),
            ));
        }
        if setup.param_count == 0 {
            return Err(XlSetupError::Config(
                "Parameter block length must be greater than zero".to_string(),
            ));
        }
        for block in &setup.blocks {
            if block.len == 0 {
                return Err(XlSetupError::Config(format!(
                    "Block at row {} has zero length",
                    block.start_row
                )));
            }
        }
        for band in &setup.note_bands {
            if band.start >= band.end {
                return Err(XlSetupError::Config(format!(
                    "Note band {}..{} is empty or reversed",
                    band.start, band.end
                )));
            }
        }
        if self.plan.translation.languages.is_empty() {
            return Err(XlSetupError::Config(
                "Translation plan must declare at least one language".to_string(),
            ));
        }

        Ok(Extractor { plan: self.plan })
    }
}

/// ワークブックからテキスト構成ファイルを生成する抽出器
///
/// `ExtractorBuilder`経由で構築します。抽出器は実行間で状態を
/// 共有しません（実行ごとに新しいレコード集合が構築されます）。
#[derive(Debug, Clone)]
pub struct Extractor {
    plan: ExtractionPlan,
}

impl Extractor {
    /// セットアップ抽出を実行し、出力ファイル一式を書き出す
    ///
    /// 出力: `mps3.ini`、`HMISetup.ini`（該当シートがある場合のみ）、
    /// 言語ごとの`<code>.lng`とノートバンドファイル`<code><n>.lng`。
    /// すべてWindows-1252で出力されます。
    ///
    /// # 引数
    ///
    /// * `input` - XLSXワークブックのリーダー
    /// * `out_dir` - 出力ディレクトリ（存在している必要があります）
    pub fn extract_setup<R: Read + Seek>(
        &self,
        input: R,
        out_dir: &Path,
    ) -> Result<(), XlSetupError> {
        let source = WorkbookSource::open(input)?;
        let setup = &self.plan.setup;

        // 1. 必須シートの検証と抽出（構成エラーはファイルを1つも書く前に返す）
        if !source.has_sheet(setup.machine_config.sheet) {
            return Err(XlSetupError::Config(format!(
                "Machine config sheet {} is missing from the workbook",
                setup.machine_config.sheet
            )));
        }
        let records = collect_setup_records(&source, setup)?;

        // 2. 機械構成ファイル
        let machine = extract_values(&source, &setup.machine_config);
        write_text_file(
            &out_dir.join(MACHINE_CONFIG_FILE),
            &render_value_list(&machine),
            FileEncoding::Windows1252,
        )?;

        // 3. HMI構成ファイル（任意シート: 欠落も空も黙って読み飛ばす）
        if source.has_sheet(setup.hmi_config.sheet) {
            let hmi = extract_values(&source, &setup.hmi_config);
            if !hmi.is_empty() {
                write_text_file(
                    &out_dir.join(HMI_CONFIG_FILE),
                    &render_value_list(&hmi),
                    FileEncoding::Windows1252,
                )?;
            }
        }

        // 4. 言語ファイルとノートバンドファイル
        for language in &setup.languages {
            write_text_file(
                &out_dir.join(language_file_name(&language.code)),
                &render_language_file(&records, &language.code),
                FileEncoding::Windows1252,
            )?;

            for (index, band) in setup.note_bands.iter().enumerate() {
                write_text_file(
                    &out_dir.join(note_band_file_name(&language.code, index)),
                    &render_note_band(&records, &language.code, band),
                    FileEncoding::Windows1252,
                )?;
            }
        }

        Ok(())
    }

    /// セットアップ抽出のレコード集合のみを構築する（ファイル出力なし）
    ///
    /// 抽出結果をプログラムから直接利用する場合に使用します。
    pub fn collect_setup_records<R: Read + Seek>(
        &self,
        input: R,
    ) -> Result<RecordSet, XlSetupError> {
        let source = WorkbookSource::open(input)?;
        collect_setup_records(&source, &self.plan.setup)
    }

    /// 翻訳抽出を実行し、出力ファイル一式を書き出す
    ///
    /// 出力: `lng.ini`（Windows-1252）と、言語リスト順の
    /// `touchNN.ini`（UTF-16LE + BOM）。
    pub fn extract_translations<R: Read + Seek>(
        &self,
        input: R,
        out_dir: &Path,
    ) -> Result<(), XlSetupError> {
        let source = WorkbookSource::open(input)?;
        let translation = &self.plan.translation;

        for (name, sheet) in [
            ("Layout", translation.layout_sheet),
            ("Page name", translation.page_sheet),
            ("IO message", translation.io_message_sheet),
            ("Language config", translation.language_config_primary.sheet),
        ] {
            if !source.has_sheet(sheet) {
                return Err(XlSetupError::Config(format!(
                    "{} sheet {} is missing from the workbook",
                    name, sheet
                )));
            }
        }

        // 1. 言語構成ファイル（2ブロックの連結）
        let mut entries = extract_values(&source, &translation.language_config_primary);
        entries.extend(extract_values(&source, &translation.language_config_secondary));
        write_text_file(
            &out_dir.join(LANGUAGE_CONFIG_FILE),
            &render_value_list(&entries),
            FileEncoding::Windows1252,
        )?;

        // 2. 言語ごとのタッチパネル用ファイル
        for (index, language) in translation.languages.iter().enumerate() {
            if !source.has_sheet(language.sheet_index) {
                return Err(XlSetupError::Config(format!(
                    "Language sheet {} for '{}' is missing from the workbook",
                    language.sheet_index, language.code
                )));
            }

            let text = render_translation(&source, translation, language)?;
            write_text_file(
                &out_dir.join(touch_file_name(index)),
                &text,
                FileEncoding::Utf16,
            )?;
        }

        Ok(())
    }

    /// 構築時に検証済みのプランへの参照
    pub fn plan(&self) -> &ExtractionPlan {
        &self.plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{BlockSpec, SetupLanguage};
    use crate::record::RecordKind;

    #[test]
    fn test_default_build_succeeds() {
        let extractor = ExtractorBuilder::new().build().unwrap();
        assert_eq!(extractor.plan().setup.languages.len(), 2);
        assert_eq!(extractor.plan().translation.languages.len(), 26);
    }

    #[test]
    fn test_build_rejects_empty_setup_languages() {
        let mut setup = SetupPlan::default();
        setup.languages.clear();

        let result = ExtractorBuilder::new().with_setup_plan(setup).build();
        assert!(matches!(result, Err(XlSetupError::Config(_))));
    }

    #[test]
    fn test_build_rejects_zero_param_count() {
        let setup = SetupPlan {
            param_count: 0,
            ..SetupPlan::default()
        };

        let result = ExtractorBuilder::new().with_setup_plan(setup).build();
        assert!(matches!(result, Err(XlSetupError::Config(_))));
    }

    #[test]
    fn test_build_rejects_zero_length_block() {
        let mut setup = SetupPlan::default();
        setup.blocks.push(BlockSpec {
            kind: RecordKind::Menu,
            start_row: 2000,
            len: 0,
        });

        let result = ExtractorBuilder::new().with_setup_plan(setup).build();
        assert!(matches!(result, Err(XlSetupError::Config(_))));
    }

    #[test]
    fn test_build_rejects_reversed_note_band() {
        let mut setup = SetupPlan::default();
        setup.note_bands = vec![200..100];

        let result = ExtractorBuilder::new().with_setup_plan(setup).build();
        assert!(matches!(result, Err(XlSetupError::Config(_))));
    }

    #[test]
    fn test_build_rejects_empty_translation_languages() {
        let mut translation = TranslationPlan::default();
        translation.languages.clear();

        let result = ExtractorBuilder::new()
            .with_translation_plan(translation)
            .build();
        assert!(matches!(result, Err(XlSetupError::Config(_))));
    }

    #[test]
    fn test_with_excluded_rows_overrides_plan() {
        let extractor = ExtractorBuilder::new()
            .with_excluded_rows(None)
            .build()
            .unwrap();
        assert_eq!(extractor.plan().translation.excluded_rows, None);

        let extractor = ExtractorBuilder::new()
            .with_excluded_rows(Some(10..20))
            .build()
            .unwrap();
        assert_eq!(extractor.plan().translation.excluded_rows, Some(10..20));
    }

    #[test]
    fn test_builder_setters_chain() {
        let plan = ExtractionPlan::default();
        let extractor = ExtractorBuilder::new()
            .with_plan(plan.clone())
            .build()
            .unwrap();
        assert_eq!(extractor.plan(), &plan);

        // 言語1つの最小構成でも構築できる
        let setup = SetupPlan {
            languages: vec![SetupLanguage {
                code: "deutsch".to_string(),
                sheet_index: 1,
            }],
            ..SetupPlan::default()
        };
        assert!(ExtractorBuilder::new().with_setup_plan(setup).build().is_ok());
    }
}
