use transcript_core::layout::{page_rows, Layout};
use transcript_core::rows::Row;
use transcript_core::segment::Segmenter;
use transcript_core::{Document, LayoutMode, ParserConfig};

use crate::config::{effective_config, ParserArgs};
use crate::input::{load_document, InputArgs};
use crate::prelude::{eprintln, *};

#[derive(Debug, clap::Args)]
pub struct RowsOptions {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub parser: ParserArgs,

    /// Do not split pages into two columns
    #[arg(long)]
    pub single: bool,
}

/// One printed line of the `rows` table.
#[derive(Debug, Clone, PartialEq)]
pub struct RowLine {
    pub page: usize,
    pub column: usize,
    pub y: f32,
    pub kind: &'static str,
    pub text: String,
}

pub fn run(options: RowsOptions, global: crate::Global) -> Result<()> {
    let config = effective_config(&global, &options.parser)?;
    let layout = if options.single || config.layout == LayoutMode::Single {
        Layout::SingleColumn
    } else {
        Layout::TwoColumn
    };
    let doc = load_document(&options.input)?;
    let lines = rows_data(&doc, &config, layout)?;

    if global.verbose {
        eprintln!("{} page(s), {} row(s), {:?}", doc.pages.len(), lines.len(), layout);
    }

    let mut table = new_table();
    table.set_titles(prettytable::row!["Page", "Col", "Y", "Kind", "Text"]);
    for line in &lines {
        table.add_row(prettytable::row![
            line.page,
            line.column,
            f!("{:.1}", line.y),
            line.kind,
            line.text
        ]);
    }
    table.printstd();

    Ok(())
}

/// Group every column of every page into rows and classify them the way the
/// parser would.
pub fn rows_data(doc: &Document, config: &ParserConfig, layout: Layout) -> Result<Vec<RowLine>> {
    let term_re = config
        .calendar
        .heading_regex()
        .wrap_err("Invalid term calendar")?;
    let mut lines = Vec::new();
    for (page_idx, page) in doc.pages.iter().enumerate() {
        for (col_idx, rows) in page_rows(page, layout, config.row_bucket).iter().enumerate() {
            let mut segmenter = Segmenter::new(&term_re);
            for Row { y, text } in rows {
                let kind = segmenter.feed(text);
                lines.push(RowLine {
                    page: page_idx + 1,
                    column: col_idx + 1,
                    y: *y,
                    kind: kind.name(),
                    text: text.clone(),
                });
            }
        }
    }
    Ok(lines)
}
