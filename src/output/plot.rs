//! gnuplot script generation with a linear fit per series.

use std::path::PathBuf;

use super::format_number;

/// Colour families, one per branch in first-seen order
pub const LINE_COLORS: [[&str; 4]; 4] = [
    ["#bbe1fa", "#3282b8", "#0f4c75", "#1b262c"],
    ["#f1bc31", "#e25822", "#b22222", "#7c0a02"],
    ["#64e291", "#a0cc78", "#589167", "#207561"],
    ["#cc6666", "#aa4444", "#992222", "#660000"],
];

/// Hands out line colours for one plot.
///
/// Each new branch takes the next colour family; successive series of the
/// same branch take successive shades of that family, wrapping around.
#[derive(Debug, Default)]
pub struct ColorAllocator {
    /// `(branch, shades handed out)` in first-seen order
    branches: Vec<(String, usize)>,
}

impl ColorAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_color(&mut self, branch: &str) -> &'static str {
        let index = match self.branches.iter().position(|(name, _)| name == branch) {
            Some(i) => i,
            None => {
                self.branches.push((branch.to_string(), 0));
                self.branches.len() - 1
            }
        };

        let family = &LINE_COLORS[index % LINE_COLORS.len()];
        let used = &mut self.branches[index].1;
        let color = family[*used % family.len()];
        *used += 1;
        color
    }
}

/// Script-wide settings
#[derive(Debug, Clone, PartialEq)]
pub struct PlotOptions {
    pub title: String,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    pub xscale: f64,
    pub yscale: f64,
}

/// One data file to plot and fit
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSeries {
    /// Token used to name the fit function and its parameters
    pub id: String,
    pub branch: String,
    /// Legend text for the fit line
    pub title: String,
    pub path: PathBuf,
}

/// Reduce `raw` to characters gnuplot accepts in an identifier
pub fn series_id(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

fn preamble(opts: &PlotOptions) -> String {
    let mut out = String::new();
    out.push_str("# Output W3C Scalable Vector Graphics\n");
    out.push_str("set terminal svg\n\n");
    out.push_str("# Read comma-delimited data from file\n");
    out.push_str("set datafile separator comma\n\n");
    out.push_str("# Put the line labels at the top left\n");
    out.push_str("set key left\n");

    if let Some(ref xlabel) = opts.xlabel {
        out.push_str(&format!("set xlabel '{}'\n", xlabel));
    }
    if let Some(ref ylabel) = opts.ylabel {
        out.push_str(&format!("set ylabel '{}'\n", ylabel));
    }
    out
}

/// Render the whole script. Colours are allocated in series order.
pub fn render_plot(opts: &PlotOptions, series: &[PlotSeries]) -> String {
    let scaled_cols = format!(
        "(column(1)*({})):(column(2)*({}))",
        format_number(opts.xscale),
        format_number(opts.yscale)
    );

    let mut out = preamble(opts);
    out.push_str(&format!("set title '{}'\n", opts.title));

    let mut colors = ColorAllocator::new();
    let mut plot_args = Vec::with_capacity(series.len() * 2);
    for s in series {
        let id = &s.id;
        let path = s.path.display();
        let func = format!("f{}(x)", id);

        out.push_str(&format!("{} = a{}*x + b{}\n", func, id, id));
        out.push_str(&format!(
            "fit {} '{}' using {} via a{},b{}\n",
            func, path, scaled_cols, id, id
        ));

        let color = colors.next_color(&s.branch);
        plot_args.push(format!(
            "'{}' using {} with points title \"\" lc rgb '{}' pointtype 3 pointsize 0.5",
            path, scaled_cols, color
        ));
        plot_args.push(format!(
            "{} title \"{}\" lc rgb '{}' linewidth 4",
            func, s.title, color
        ));
    }

    out.push_str("plot ");
    out.push_str(&plot_args.join(",\\\n  "));
    out.push('\n');
    out
}
