use pdf_extract::{Document, MediaBox, OutputDev, OutputError, Transform};

use crate::error::ImportError;

use super::{
    amount::normalize_amount,
    parser::{ParsedStatement, StatementParser},
};

const TABLE_COLUMNS: usize = 4;

/// Horizontal gap, in font sizes, that separates two table cells.
const CELL_GAP: f64 = 1.0;
/// Smallest horizontal gap, in font sizes, read as a space inside a cell.
const WORD_GAP: f64 = 0.1;

/// Statement tables laid out as `date | amount | operation | details`.
///
/// Every page carries its own header row, which is dropped.
pub struct PdfTableParser;

impl StatementParser for PdfTableParser {
    fn parse(&self, contents: &[u8]) -> Result<ParsedStatement, ImportError> {
        // pdf-extract panics on some malformed documents
        let extracted = std::panic::catch_unwind(|| page_glyphs(contents)).map_err(|_| {
            tracing::warn!("pdf text extraction panicked");
            ImportError::EmptyOrUnparseable
        })?;

        let pages = extracted.map_err(|err| {
            tracing::warn!("error extracting pdf text: {}", err);
            ImportError::EmptyOrUnparseable
        })?;

        let mut parsed = ParsedStatement::default();
        for glyphs in pages {
            parse_rows(page_table(glyphs), &mut parsed);
        }

        Ok(parsed)
    }
}

fn page_glyphs(contents: &[u8]) -> Result<Vec<Vec<Glyph>>, OutputError> {
    let mut doc = Document::load_mem(contents)?;
    if doc.is_encrypted() {
        doc.decrypt("")?;
    }

    let mut collector = GlyphCollector::default();
    pdf_extract::output_doc(&doc, &mut collector)?;

    Ok(collector.pages)
}

fn parse_rows(rows: Vec<[String; TABLE_COLUMNS]>, parsed: &mut ParsedStatement) {
    for [date, amount, _operation, details] in rows {
        if amount.is_empty() {
            continue;
        }

        parsed.push_amount(date, normalize_amount(&amount), details);
    }
}

/// A piece of text placed on the page, in PDF user space (y grows upwards).
#[derive(Debug, Clone, PartialEq)]
struct Glyph {
    x: f64,
    end: f64,
    y: f64,
    size: f64,
    text: String,
}

#[derive(Debug, Clone, PartialEq)]
struct Cell {
    start: f64,
    end: f64,
    text: String,
}

impl Cell {
    fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

#[derive(Default)]
struct GlyphCollector {
    pages: Vec<Vec<Glyph>>,
    current: Vec<Glyph>,
}

impl OutputDev for GlyphCollector {
    fn begin_page(
        &mut self,
        _page_num: u32,
        _media_box: &MediaBox,
        _art_box: Option<(f64, f64, f64, f64)>,
    ) -> Result<(), OutputError> {
        self.current.clear();
        Ok(())
    }

    fn end_page(&mut self) -> Result<(), OutputError> {
        self.pages.push(std::mem::take(&mut self.current));
        Ok(())
    }

    fn output_character(
        &mut self,
        trm: &Transform,
        width: f64,
        _spacing: f64,
        font_size: f64,
        char: &str,
    ) -> Result<(), OutputError> {
        let scale_x = font_size * (trm.m11 + trm.m21);
        let scale_y = font_size * (trm.m12 + trm.m22);
        let size = (scale_x * scale_y).abs().sqrt();
        let x = trm.m31;

        self.current.push(Glyph {
            x,
            end: x + width * size,
            y: trm.m32,
            size,
            text: char.to_owned(),
        });

        Ok(())
    }

    fn begin_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_line(&mut self) -> Result<(), OutputError> {
        Ok(())
    }
}

/// Rows of the page table, top to bottom, trimmed to the first four columns.
///
/// The first line with at least four cells is the header. Its cells fix the
/// column boundaries, later lines are split along them. Lines without a date
/// or with fewer than three filled columns (titles, page totals) are ignored.
fn page_table(glyphs: Vec<Glyph>) -> Vec<[String; TABLE_COLUMNS]> {
    let mut lines = text_lines(glyphs).into_iter().map(|line| line_cells(&line));

    let Some(header) = lines.by_ref().find(|cells| cells.len() >= TABLE_COLUMNS) else {
        return Vec::new();
    };

    let boundaries: Vec<f64> = header
        .windows(2)
        .take(TABLE_COLUMNS)
        .map(|pair| (pair[0].end + pair[1].start) / 2.0)
        .collect();

    lines
        .filter_map(|cells| {
            let mut row: [String; TABLE_COLUMNS] = Default::default();

            for cell in cells {
                let column = boundaries.iter().filter(|b| cell.center() > **b).count();
                let Some(slot) = row.get_mut(column) else {
                    continue;
                };

                if !slot.is_empty() {
                    slot.push(' ');
                }
                slot.push_str(&cell.text);
            }

            let filled = row.iter().filter(|text| !text.is_empty()).count();
            (!row[0].is_empty() && filled >= TABLE_COLUMNS - 1).then_some(row)
        })
        .collect()
}

/// Groups glyphs into lines, top of the page first, each sorted left to right.
fn text_lines(mut glyphs: Vec<Glyph>) -> Vec<Vec<Glyph>> {
    glyphs.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

    let mut lines: Vec<Vec<Glyph>> = Vec::new();
    for glyph in glyphs {
        match lines.last_mut() {
            Some(line) if (line[0].y - glyph.y).abs() <= line[0].size * 0.5 => line.push(glyph),
            _ => lines.push(vec![glyph]),
        }
    }

    for line in &mut lines {
        line.sort_by(|a, b| a.x.total_cmp(&b.x));
    }

    lines
}

/// Splits a line into cells on wide horizontal gaps. Whitespace glyphs only
/// widen the gap, so `1 500,00` stays one cell.
fn line_cells(line: &[Glyph]) -> Vec<Cell> {
    let mut cells: Vec<Cell> = Vec::new();

    for glyph in line.iter().filter(|glyph| !glyph.text.trim().is_empty()) {
        let text = glyph.text.trim();

        match cells.last_mut() {
            Some(cell) if glyph.x - cell.end < glyph.size * CELL_GAP => {
                if glyph.x - cell.end > glyph.size * WORD_GAP {
                    cell.text.push(' ');
                }
                cell.text.push_str(text);
                cell.end = cell.end.max(glyph.end);
            }
            _ => cells.push(Cell {
                start: glyph.x,
                end: glyph.end,
                text: text.to_owned(),
            }),
        }
    }

    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement_parsing::parser::RawRow;

    const SIZE: f64 = 10.0;
    const CHAR_WIDTH: f64 = 5.0;

    /// Lays out `text` one glyph per character, the way a PDF content stream
    /// places it, spaces included.
    fn text_at(x: f64, y: f64, text: &str) -> Vec<Glyph> {
        text.chars()
            .enumerate()
            .map(|(i, c)| {
                let x = x + i as f64 * CHAR_WIDTH;
                Glyph {
                    x,
                    end: x + CHAR_WIDTH,
                    y,
                    size: SIZE,
                    text: c.to_string(),
                }
            })
            .collect()
    }

    fn table_row(y: f64, cells: [&str; 4]) -> Vec<Glyph> {
        [50.0, 150.0, 260.0, 360.0]
            .into_iter()
            .zip(cells)
            .flat_map(|(x, text)| text_at(x, y, text))
            .collect()
    }

    #[test]
    fn keeps_spaces_inside_cells() {
        let cells = line_cells(&text_at(150.0, 700.0, "- 1 500,00 ₸"));

        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].text, "- 1 500,00 ₸");
    }

    #[test]
    fn lines_run_top_to_bottom() {
        let mut glyphs = text_at(50.0, 600.0, "low");
        glyphs.extend(text_at(50.0, 700.0, "high"));

        let lines: Vec<Vec<Cell>> = text_lines(glyphs)
            .iter()
            .map(|line| line_cells(line))
            .collect();

        assert_eq!(lines[0][0].text, "high");
        assert_eq!(lines[1][0].text, "low");
    }

    #[test]
    fn drops_header_row_of_every_page() {
        let mut page_one = text_at(50.0, 760.0, "Выписка по Kaspi Gold");
        page_one.extend(table_row(730.0, ["Дата", "Сумма", "Операция", "Детали"]));
        page_one.extend(table_row(
            710.0,
            ["05.01.24", "- 1 500,00 ₸", "Покупка", "MAGNUM CASH&CARRY"],
        ));
        page_one.extend(table_row(
            690.0,
            ["06.01.24", "+ 5 000,00 ₸", "Пополнение", "С Kaspi Депозита"],
        ));

        let mut page_two = table_row(730.0, ["Дата", "Сумма", "Операция", "Детали"]);
        page_two.extend(table_row(
            710.0,
            ["07.01.24", "- 2 100,00 ₸", "Покупка", "Яндекс.Такси"],
        ));
        page_two.extend(table_row(
            690.0,
            ["08.01.24", "- oops ₸", "Покупка", "Beeline"],
        ));

        let mut parsed = ParsedStatement::default();
        parse_rows(page_table(page_one), &mut parsed);
        parse_rows(page_table(page_two), &mut parsed);

        assert_eq!(
            parsed.rows,
            vec![
                RawRow {
                    date: "05.01.24".to_owned(),
                    amount: -1500.0,
                    details: "MAGNUM CASH&CARRY".to_owned(),
                },
                RawRow {
                    date: "06.01.24".to_owned(),
                    amount: 5000.0,
                    details: "С Kaspi Депозита".to_owned(),
                },
                RawRow {
                    date: "07.01.24".to_owned(),
                    amount: -2100.0,
                    details: "Яндекс.Такси".to_owned(),
                },
            ]
        );
        assert_eq!(parsed.skipped, 1);
    }

    #[test]
    fn blank_amount_is_ignored_not_skipped() {
        let mut page = table_row(730.0, ["Date", "Amount", "Operation", "Details"]);
        page.extend(table_row(710.0, ["08.01.24", "", "Hold", "WOLT.COM"]));

        let mut parsed = ParsedStatement::default();
        parse_rows(page_table(page), &mut parsed);

        assert_eq!(parsed, ParsedStatement::default());
    }

    #[test]
    fn right_aligned_amounts_land_in_their_column() {
        let mut page = table_row(730.0, ["Date", "Amount", "Operation", "Details"]);
        page.extend(text_at(50.0, 710.0, "01.02.24"));
        page.extend(text_at(135.0, 710.0, "12 100,00"));
        page.extend(text_at(260.0, 710.0, "Purchase"));
        page.extend(text_at(360.0, 710.0, "WOLT.COM"));

        let rows = page_table(page);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][1], "12 100,00");
        assert_eq!(rows[0][3], "WOLT.COM");
    }

    #[test]
    fn keeps_only_first_four_columns() {
        let mut page = text_at(460.0, 730.0, "Balance");
        page.extend(table_row(730.0, ["h1", "h2", "h3", "h4"]));
        page.extend(text_at(460.0, 710.0, "9 999,00"));
        page.extend(table_row(710.0, ["01.02.24", "100", "Покупка", "WOLT.COM"]));

        let mut parsed = ParsedStatement::default();
        parse_rows(page_table(page), &mut parsed);

        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0].details, "WOLT.COM");
        assert_eq!(parsed.rows[0].amount, 100.0);
    }

    #[test]
    fn page_without_table_yields_nothing() {
        let mut page = text_at(50.0, 760.0, "Страница 3 из 3");
        page.extend(text_at(50.0, 740.0, "Спасибо что выбрали нас"));

        assert!(page_table(page).is_empty());
    }

    #[test]
    fn reads_table_from_pdf_file() {
        let parsed = PdfTableParser
            .parse(include_bytes!("../../tests/fixtures/statement.pdf"))
            .unwrap();

        assert_eq!(
            parsed.rows,
            vec![
                RawRow {
                    date: "05.01.24".to_owned(),
                    amount: -1500.0,
                    details: "MAGNUM CASH&CARRY".to_owned(),
                },
                RawRow {
                    date: "06.01.24".to_owned(),
                    amount: 5000.0,
                    details: "top-up from deposit".to_owned(),
                },
                RawRow {
                    date: "07.01.24".to_owned(),
                    amount: -2100.0,
                    details: "Yandex.Taxi".to_owned(),
                },
            ]
        );
        assert_eq!(parsed.skipped, 1);
    }

    #[test]
    fn invalid_pdf_is_unparseable() {
        assert_eq!(
            PdfTableParser.parse(b"%PDF-broken"),
            Err(ImportError::EmptyOrUnparseable)
        );
    }
}
