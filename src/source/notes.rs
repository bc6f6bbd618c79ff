//! Cell Notes Module
//!
//! XLSX内部のXMLファイルからセルノート（注釈）を抽出するモジュール。
//! calamineはノートを公開しないため、ZIPアーカイブ内の
//! `xl/comments*.xml`をquick-xmlで直接解析します。
//! ノート本文の改行はそのまま保持されます。

use std::collections::HashMap;
use std::io::{Read, Seek};
use zip::ZipArchive;

use crate::error::XlSetupError;
use crate::security::{validate_zip_path, SecurityConfig};

/// (シート, 行, 列) からノート本文への写像
#[derive(Debug, Default)]
pub(crate) struct NoteCatalog {
    notes: HashMap<(usize, u32, u32), String>,
}

impl NoteCatalog {
    /// XLSXファイル（ZIPアーカイブ）からすべてのセルノートを解析
    ///
    /// ノートを持たないワークブックでは空のカタログを返します。
    ///
    /// # 引数
    ///
    /// * `xlsx_reader` - XLSXファイルを読み込むためのリーダー（Read + Seekトレイトを実装）
    pub fn parse<R: Read + Seek>(xlsx_reader: R) -> Result<Self, XlSetupError> {
        let security_config = SecurityConfig::default();

        let mut archive =
            ZipArchive::new(xlsx_reader).map_err(|e| XlSetupError::Zip(format!("{}", e)))?;

        // セキュリティチェック: ファイル数の上限
        if archive.len() > security_config.max_file_count {
            return Err(XlSetupError::SecurityViolation(format!(
                "ZIP archive contains too many files: {} (max: {})",
                archive.len(),
                security_config.max_file_count
            )));
        }

        // 1. パス検証しつつアーカイブ内のファイル名を収集
        let mut file_names = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let file_name = archive
                .by_index(i)
                .map_err(|e| XlSetupError::Zip(format!("{}", e)))?
                .name()
                .to_string();

            // パストラバーサル対策
            validate_zip_path(&file_name).map_err(|e| {
                XlSetupError::SecurityViolation(format!("Invalid ZIP path: {}", e))
            })?;

            file_names.push(file_name);
        }

        // 2. シートのリレーションシップからコメントパートの対応を解決
        //    (コメントパート名, シートインデックス)
        let mut comment_parts: Vec<(String, usize)> = Vec::new();
        for file_name in &file_names {
            let Some(sheet_index) = sheet_index_from_rels_path(file_name) else {
                continue;
            };
            let mut rels_file = archive
                .by_name(file_name)
                .map_err(|e| XlSetupError::Zip(format!("{}", e)))?;
            if let Some(target) = comments_target(&mut rels_file)? {
                comment_parts.push((resolve_part_path(&target), sheet_index));
            }
        }

        // 3. コメントパートを解析してノートを収集
        let mut notes = HashMap::new();
        for (part_name, sheet_index) in comment_parts {
            // リレーションシップの指す先が欠けている場合はスキップ
            let Ok(mut comments_file) = archive.by_name(&part_name) else {
                continue;
            };
            for ((row, col), text) in parse_comments_xml(&mut comments_file)? {
                notes.insert((sheet_index, row, col), text);
            }
        }

        Ok(Self { notes })
    }

    /// 指定セルのノート本文を取得
    pub fn get(&self, sheet: usize, row: u32, col: u32) -> Option<&str> {
        self.notes.get(&(sheet, row, col)).map(String::as_str)
    }
}

/// シートのリレーションシップファイルパスからシートインデックスを抽出
///
/// 実際のシート対応はworkbook.xmlから取得すべきですが、
/// ここではファイル名の番号から推測します（簡易実装）。
/// 例: `xl/worksheets/_rels/sheet1.xml.rels` -> `0`
fn sheet_index_from_rels_path(path: &str) -> Option<usize> {
    let name = path.strip_prefix("xl/worksheets/_rels/sheet")?;
    let num_str = name.strip_suffix(".xml.rels")?;
    let num = num_str.parse::<usize>().ok()?;
    (num >= 1).then(|| num - 1)
}

/// リレーションシップファイルからコメントパートのターゲットを取得
fn comments_target(reader: &mut impl Read) -> Result<Option<String>, XlSetupError> {
    use quick_xml::events::Event;
    use quick_xml::Reader;

    let mut xml_content = Vec::new();
    reader.read_to_end(&mut xml_content)?;

    let mut xml_reader = Reader::from_reader(xml_content.as_slice());
    xml_reader.trim_text(true);

    let mut buf = Vec::new();

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                // Event::Emptyは自己終了タグの場合に発生
                if e.name().as_ref() == b"Relationship" {
                    let mut is_comments = false;
                    let mut target = None;

                    for attr in e.attributes() {
                        let attr = attr.map_err(|e| {
                            XlSetupError::Config(format!("XML attribute error: {}", e))
                        })?;
                        match attr.key.as_ref() {
                            b"Type" => {
                                let type_str = std::str::from_utf8(&attr.value)?;
                                is_comments = type_str.ends_with("/comments");
                            }
                            b"Target" => {
                                target = Some(std::str::from_utf8(&attr.value)?.to_string());
                            }
                            _ => {}
                        }
                    }

                    if is_comments {
                        if let Some(target) = target {
                            return Ok(Some(target));
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlSetupError::Config(format!("XML parse error: {}", e))),
            _ => {}
        }
    }

    Ok(None)
}

/// リレーションシップのターゲットをアーカイブ内のパートパスに解決
///
/// ターゲットは`xl/worksheets/`からの相対パス、またはアーカイブルートからの
/// 絶対パス（`/`始まり）で与えられます。
fn resolve_part_path(target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        absolute.to_string()
    } else if let Some(relative) = target.strip_prefix("../") {
        format!("xl/{}", relative)
    } else {
        format!("xl/worksheets/{}", target)
    }
}

/// コメントXML（`xl/comments*.xml`）からノートを解析
///
/// `<commentList>`内の各`<comment ref="A10">`について、`<text>`配下の
/// テキストランを連結して1つのノート本文にします。
fn parse_comments_xml(
    reader: &mut impl Read,
) -> Result<Vec<((u32, u32), String)>, XlSetupError> {
    use quick_xml::events::Event;
    use quick_xml::Reader;

    let mut xml_content = Vec::new();
    reader.read_to_end(&mut xml_content)?;

    let mut xml_reader = Reader::from_reader(xml_content.as_slice());
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut notes = Vec::new();

    let mut current_ref: Option<(u32, u32)> = None;
    let mut current_text = String::new();
    let mut in_text = false;
    let mut in_t = false;

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"comment" => {
                    current_ref = None;
                    current_text.clear();

                    for attr in e.attributes() {
                        let attr = attr.map_err(|e| {
                            XlSetupError::Config(format!("XML attribute error: {}", e))
                        })?;
                        if attr.key.as_ref() == b"ref" {
                            let ref_str = std::str::from_utf8(&attr.value)?;
                            current_ref = parse_cell_ref(ref_str);
                        }
                    }
                }
                b"text" => {
                    in_text = true;
                }
                b"t" if in_text => {
                    in_t = true;
                }
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_t {
                    let text = e
                        .unescape()
                        .map_err(|e| XlSetupError::Config(format!("XML text error: {}", e)))?;
                    current_text.push_str(&text);
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"comment" => {
                    if let Some(coord) = current_ref.take() {
                        if !current_text.is_empty() {
                            notes.push((coord, current_text.clone()));
                        }
                    }
                    current_text.clear();
                }
                b"text" => {
                    in_text = false;
                }
                b"t" => {
                    in_t = false;
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlSetupError::Config(format!("XML parse error: {}", e))),
            _ => {}
        }
    }

    Ok(notes)
}

/// セル参照文字列を座標に変換（例: "A1" -> (0, 0)）
fn parse_cell_ref(ref_str: &str) -> Option<(u32, u32)> {
    let mut col_str = String::new();
    let mut row_str = String::new();

    for ch in ref_str.chars() {
        if ch.is_ascii_alphabetic() {
            col_str.push(ch);
        } else if ch.is_ascii_digit() {
            row_str.push(ch);
        }
    }

    if col_str.is_empty() || row_str.is_empty() {
        return None;
    }

    // 列を数値に変換（A=0, B=1, ..., Z=25, AA=26, ...）
    let col = col_str
        .chars()
        .rev()
        .enumerate()
        .map(|(i, ch)| {
            let val = (ch.to_ascii_uppercase() as u32) - ('A' as u32) + 1;
            val * 26_u32.pow(i as u32)
        })
        .sum::<u32>()
        - 1;

    // 行を数値に変換（1始まりなので0始まりに変換）
    let row = row_str.parse::<u32>().ok()? - 1;

    Some((row, col))
}
