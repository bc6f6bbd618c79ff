//! Section Scan Module
//!
//! 翻訳抽出（セクション駆動モード）の走査を実装するモジュール。
//! レイアウトシートのセクションマーカーとキー接頭辞に従い、
//! 1言語ぶんの出力ファイル全体をテキストとして構築します。

use std::fmt::Write as _;

use crate::error::XlSetupError;
use crate::plan::{LanguageSpec, TranslationPlan};
use crate::source::CellSource;
use crate::types::CellValue;

/// 1言語のタッチパネル用テキストファイルを描画する
///
/// ファイルは3部構成です:
/// 1. セクション駆動の本体（レイアウトシートが構造を定義する）
/// 2. ページ/画面名（行範囲はページシートのセルから読む）
/// 3. IOメッセージ（`[IO_TEXTE]`セクション、空行でも継続）
pub(crate) fn render_translation<S: CellSource>(
    source: &S,
    plan: &TranslationPlan,
    language: &LanguageSpec,
) -> Result<String, XlSetupError> {
    let mut out = String::new();

    scan_sections(source, plan, language, &mut out);
    append_page_names(source, plan, language, &mut out)?;
    append_io_messages(source, plan, language, &mut out);

    Ok(out)
}

/// セクション駆動の本体走査
///
/// レイアウトシートのセクション列に`[`で始まるセルが現れた行が
/// セクションの開始行です。キー接頭辞は同じ行のキー列から読み、
/// 空の場合は直前のセクションの接頭辞を引き継ぎます。
/// 各エントリの番号はセクション開始行からのオフセットで、
/// マーカー行自身のテキストがオフセット0になります。
/// 言語シート側のテキストが空になるとそのブロックは閉じられ、
/// 次のセクションマーカーまでエントリは出力されません。
fn scan_sections<S: CellSource>(
    source: &S,
    plan: &TranslationPlan,
    language: &LanguageSpec,
    out: &mut String,
) {
    // 走査範囲は言語シートの行数で決まる（レイアウトシートの方が
    // 長くても、テキストの無いセクションは出力されない）
    let row_count = source.row_count(language.sheet_index);

    let mut section_open = false;
    let mut in_block = false;
    let mut section_start_row = plan.start_row;
    let mut prefix = String::new();

    for row in plan.start_row..row_count {
        if let Some(excluded) = &plan.excluded_rows {
            if excluded.contains(&row) {
                continue;
            }
        }

        let marker = source.cell(plan.layout_sheet, row, plan.section_column);
        if let CellValue::Text(marker) = &marker {
            if marker.starts_with('[') {
                if section_open {
                    out.push('\n');
                }
                section_open = true;
                in_block = true;
                section_start_row = row;

                // キー接頭辞は空でない場合のみ更新する
                let key = source.cell(plan.layout_sheet, row, plan.key_column);
                let key = key.to_normalized_string();
                if !key.is_empty() {
                    prefix = key;
                }

                out.push_str(marker);
                out.push('\n');
            }
        }

        // マーカー行も含めてテキストを評価する（マーカー行が空なら
        // そのブロックは開始と同時に閉じる）
        let text = source.cell(language.sheet_index, row, plan.text_column);
        if text.is_empty() {
            in_block = false;
        } else if in_block {
            let _ = writeln!(
                out,
                "{}{}={}",
                prefix,
                row - section_start_row,
                text.to_normalized_string()
            );
        }
    }
}

/// ページ/画面名の追記
///
/// 行範囲の境界はページシートのセルに1始まりの行番号として
/// 格納されています。空のページ名も行として出力されます。
fn append_page_names<S: CellSource>(
    source: &S,
    plan: &TranslationPlan,
    language: &LanguageSpec,
    out: &mut String,
) -> Result<(), XlSetupError> {
    let start = read_row_bound(source, plan, plan.page_start_cell)?;
    let end = read_row_bound(source, plan, plan.page_end_cell)?;

    if start < 1 {
        return Err(XlSetupError::Config(format!(
            "Page name start row must be at least 1, got {}",
            start
        )));
    }

    for row in (start - 1)..end {
        let text = source.cell(plan.page_sheet, row as u32, language.io_column);
        out.push_str(&text.to_normalized_string());
        out.push('\n');
    }

    Ok(())
}

fn read_row_bound<S: CellSource>(
    source: &S,
    plan: &TranslationPlan,
    cell: (u32, u32),
) -> Result<i64, XlSetupError> {
    source
        .cell(plan.page_sheet, cell.0, cell.1)
        .as_whole_number()
        .ok_or_else(|| {
            XlSetupError::Config(format!(
                "Page name row bound at ({}, {}) is not a whole number",
                cell.0, cell.1
            ))
        })
}

/// IOメッセージの追記
///
/// シート末尾まですべての行を出力します。空セルは空のエントリに
/// なるだけで、走査は停止しません。
fn append_io_messages<S: CellSource>(
    source: &S,
    plan: &TranslationPlan,
    language: &LanguageSpec,
    out: &mut String,
) {
    out.push_str("[IO_TEXTE]\n");

    let row_count = source.row_count(plan.io_message_sheet);
    for row in plan.io_message_start_row..row_count {
        let text = source.cell(plan.io_message_sheet, row, language.io_message_column);
        let _ = writeln!(
            out,
            "IO_{}={}",
            1 + row - plan.io_message_start_row,
            text.to_normalized_string()
        );
    }
}
