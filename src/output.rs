//! Output Module
//!
//! 出力ファイルの命名規約とエンコーディングを実装するモジュール。
//! レンダリング層はUnicode文字列を生成し、バイト列への変換は
//! ここで一度だけ行われます。

use std::fs;
use std::path::Path;

use crate::error::XlSetupError;

/// 機械構成ファイルの名前
pub(crate) const MACHINE_CONFIG_FILE: &str = "mps3.ini";

/// HMI構成ファイルの名前
pub(crate) const HMI_CONFIG_FILE: &str = "HMISetup.ini";

/// 言語構成ファイルの名前
pub(crate) const LANGUAGE_CONFIG_FILE: &str = "lng.ini";

/// 言語テキストファイルの名前（例: `deutsch.lng`）
pub(crate) fn language_file_name(code: &str) -> String {
    format!("{}.lng", code)
}

/// ノートバンドファイルの名前（例: `deutsch1.lng`、バンドは1始まり）
pub(crate) fn note_band_file_name(code: &str, band_index: usize) -> String {
    format!("{}{}.lng", code, band_index + 1)
}

/// タッチパネル用ファイルの名前（例: `touch00.ini`、言語リスト順）
pub(crate) fn touch_file_name(language_index: usize) -> String {
    format!("touch{:02}.ini", language_index)
}

/// 出力ファイルのエンコーディング
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FileEncoding {
    /// Windows-1252（セットアップ系ファイル、消費側のレガシー形式）
    Windows1252,
    /// UTF-16LE + BOM（タッチパネル用ファイル）
    Utf16,
}

/// テキストを指定エンコーディングでファイルに書き出す
///
/// Windows-1252で表現できない文字が含まれる場合はエラーになります
/// （不可逆な置換文字での出力はしません）。
pub(crate) fn write_text_file(
    path: &Path,
    text: &str,
    encoding: FileEncoding,
) -> Result<(), XlSetupError> {
    let bytes = match encoding {
        FileEncoding::Windows1252 => {
            let (encoded, _, had_errors) = encoding_rs::WINDOWS_1252.encode(text);
            if had_errors {
                return Err(XlSetupError::Encode {
                    path: path.to_path_buf(),
                    encoding: "Windows-1252",
                });
            }
            encoded.into_owned()
        }
        FileEncoding::Utf16 => {
            // BOM + UTF-16LE（encoding_rsはUTF-16のエンコードを提供しない）
            let mut bytes = Vec::with_capacity(2 + text.len() * 2);
            bytes.extend_from_slice(&[0xFF, 0xFE]);
            for unit in text.encode_utf16() {
                bytes.extend_from_slice(&unit.to_le_bytes());
            }
            bytes
        }
    };

    fs::write(path, bytes).map_err(|source| XlSetupError::WriteFile {
        path: path.to_path_buf(),
        source,
    })
}
