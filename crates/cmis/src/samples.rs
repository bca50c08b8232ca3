//! Fixed sample payloads uploaded into every test folder
//!
//! The bytes are hand-written constants and must stay byte-for-byte stable so
//! runs remain comparable.

use serde::Serialize;

/// One immutable upload fixture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SampleFile {
    pub file_name: &'static str,
    #[serde(skip)]
    pub content: &'static [u8],
    pub mime_type: &'static str,
}

const TEXT_CONTENT: &str = "これはテキストファイルのプレビューテストです。\n\
日本語の文字が正しく表示されることを確認します。\n\
\n\
Line 3: English text for mixed-language verification.\n";

/// Single-page PDF written by hand. Every xref offset points at its `N 0 obj`.
const PDF_CONTENT: &str = concat!(
    "%PDF-1.4\n",
    "1 0 obj\n",
    "<< /Type /Catalog /Pages 2 0 R >>\n",
    "endobj\n",
    "2 0 obj\n",
    "<< /Type /Pages /Kids [3 0 R] /Count 1 >>\n",
    "endobj\n",
    "3 0 obj\n",
    "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R /Resources << /Font << /F1 5 0 R >> >> >>\n",
    "endobj\n",
    "4 0 obj\n",
    "<< /Length 47 >>\n",
    "stream\n",
    "BT\n",
    "/F1 24 Tf\n",
    "72 720 Td\n",
    "(Preview Test PDF) Tj\n",
    "ET\n",
    "endstream\n",
    "endobj\n",
    "5 0 obj\n",
    "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>\n",
    "endobj\n",
    "xref\n",
    "0 6\n",
    "0000000000 65535 f \n",
    "0000000009 00000 n \n",
    "0000000058 00000 n \n",
    "0000000115 00000 n \n",
    "0000000241 00000 n \n",
    "0000000338 00000 n \n",
    "trailer\n",
    "<< /Size 6 /Root 1 0 R >>\n",
    "startxref\n",
    "408\n",
    "%%EOF\n",
);

/// 1x1 RGB PNG, single red pixel
const PNG_CONTENT: [u8; 69] = [
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, // signature
    0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, // IHDR
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, // 1x1
    0x08, 0x02, 0x00, 0x00, 0x00, 0x90, 0x77, 0x53, 0xDE, // 8-bit RGB, crc
    0x00, 0x00, 0x00, 0x0C, 0x49, 0x44, 0x41, 0x54, // IDAT
    0x78, 0xDA, 0x63, 0xF8, 0xCF, 0xC0, 0x00, 0x00, 0x03, 0x01, 0x01, 0x00, // ff 00 00
    0xF7, 0x03, 0x41, 0x43, // crc
    0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82, // IEND
];

pub const TEXT_SAMPLE: SampleFile = SampleFile {
    file_name: "テキストサンプル.txt",
    content: TEXT_CONTENT.as_bytes(),
    mime_type: "text/plain",
};

pub const PDF_SAMPLE: SampleFile = SampleFile {
    file_name: "PDFサンプル.pdf",
    content: PDF_CONTENT.as_bytes(),
    mime_type: "application/pdf",
};

pub const PNG_SAMPLE: SampleFile = SampleFile {
    file_name: "画像サンプル.png",
    content: &PNG_CONTENT,
    mime_type: "image/png",
};

/// Upload order: text, PDF, PNG
pub const ALL_SAMPLES: [SampleFile; 3] = [TEXT_SAMPLE, PDF_SAMPLE, PNG_SAMPLE];
