//! Diagnostic: decode a 3D file, print a summary and optionally write an SVG.
//!
//! Usage: `diag_network <file.3d> [plan|elevation|extended] [bearing] [out.svg]`

use anyhow::{bail, Context, Result};
use speleodraw::io::svg::SvgWriter;
use speleodraw::{
    assemble, decode_stream, DrawingOptions, LabelPolicy, LegFlags, NameFilter, ProjectionParams,
    View,
};

fn parse_view(text: &str) -> Result<View> {
    Ok(match text {
        "plan" => View::Plan,
        "elevation" => View::Elevation,
        "extended" => View::Extended,
        other => bail!("unknown view '{other}'"),
    })
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(path) = args.first() else {
        bail!("usage: diag_network <file.3d> [plan|elevation|extended] [bearing] [out.svg]");
    };
    let view = args.get(1).map(|v| parse_view(v)).transpose()?.unwrap_or_default();
    let bearing: f64 = match args.get(2) {
        Some(b) => b.parse().with_context(|| format!("bearing '{b}'"))?,
        None => 0.0,
    };

    let file = std::fs::File::open(path).with_context(|| format!("opening {path}"))?;
    let network = decode_stream(std::io::BufReader::new(file)).with_context(|| format!("decoding {path}"))?;

    println!("File:       {path}");
    if let Some(version) = network.version {
        println!("Version:    {version}");
    }
    println!("Title:      {}", network.title);
    println!("Timestamp:  {}", network.timestamp);
    println!("Extended:   {}", network.is_extended_elevation);
    println!("Stations:   {}", network.station_count());
    println!("Legs:       {}", network.legs().len());
    println!("Passages:   {}", network.passages().len());
    println!("Surveys:    {}", network.survey_tree().len() - 1);
    println!(
        "Length:     {:.2} m (excluding splays and duplicates)",
        network.length(LegFlags::SPLAY | LegFlags::DUPLICATE)
    );
    println!("Depth:      {:.2} m", network.depth());
    if let Some(extent) = network.extent() {
        println!("Extent:     {extent}");
    }
    for notification in network.notifications().iter() {
        println!("  {notification}");
    }

    let params = ProjectionParams::new(view).with_bearing(bearing);
    let projection = speleodraw::project(&network, &params)?;
    let options = DrawingOptions::default().with_station_names(LabelPolicy::All);
    let primitives = assemble(&network, &projection, &NameFilter::new(), &options)?;
    println!("Primitives: {} ({:?} at {}°)", primitives.len(), projection.view(), projection.bearing());

    if let Some(out) = args.get(3) {
        let file = std::fs::File::create(out).with_context(|| format!("creating {out}"))?;
        SvgWriter::new(std::io::BufWriter::new(file)).write(&primitives)?;
        println!("Wrote {out}");
    }
    Ok(())
}
