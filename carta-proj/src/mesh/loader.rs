//! Parser for the mesh resource format.
//!
//! A mesh file is plain CSV. The first line is a header of eight
//! fields: vertex count, cell rows, cell columns, edge vertex count,
//! pixel rows, pixel columns, map width, map height. After it come the
//! vertex lines (x, y), one line per cell (shape code then vertex
//! indices, six for a sloped cell and four for a quad), one line per
//! edge vertex (a single index), and one line per inverse pixel
//! (latitude, longitude), row major.

use carta_core::constants::HALF_PI;

use crate::coordinate::{PlanarCoord, SphericalCoord};

use super::{Cell, CellShape, MeshData};

fn float_field(fields: &[&str], index: usize, what: &str) -> Result<f64, String> {
    fields[index]
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("{} field '{}' is not a number", what, fields[index].trim()))
}

fn index_field(fields: &[&str], index: usize, limit: usize, what: &str) -> Result<usize, String> {
    let value = fields[index]
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("{} field '{}' is not an index", what, fields[index].trim()))?;
    if value >= limit {
        return Err(format!("{what} index {value} is out of range (< {limit})"));
    }
    Ok(value)
}

fn next_fields<'a>(
    lines: &mut impl Iterator<Item = &'a str>,
    expected: usize,
    what: &str,
) -> Result<Vec<&'a str>, String> {
    let line = lines.next().ok_or_else(|| format!("missing {what} line"))?;
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() < expected {
        return Err(format!(
            "{} line has {} fields, expected {}",
            what,
            fields.len(),
            expected
        ));
    }
    Ok(fields)
}

pub(super) fn parse(text: &str) -> Result<MeshData, String> {
    let mut lines = text.lines();

    let header = next_fields(&mut lines, 8, "header")?;
    let num_verts = float_field(&header, 0, "header")? as usize;
    let cell_rows = float_field(&header, 1, "header")? as usize;
    let cell_cols = float_field(&header, 2, "header")? as usize;
    let num_edge = float_field(&header, 3, "header")? as usize;
    let pix_rows = float_field(&header, 4, "header")? as usize;
    let pix_cols = float_field(&header, 5, "header")? as usize;
    let width = float_field(&header, 6, "header")?;
    let height = float_field(&header, 7, "header")?;

    if num_verts == 0 || cell_rows == 0 || cell_cols == 0 {
        return Err("mesh has no cells".into());
    }
    if pix_rows < 2 || pix_cols < 2 {
        return Err(format!(
            "inverse pixel grid {pix_rows}x{pix_cols} is too small"
        ));
    }

    let mut verts = Vec::with_capacity(num_verts);
    for v in 0..num_verts {
        let what = format!("vertex {v}");
        let fields = next_fields(&mut lines, 2, &what)?;
        verts.push(PlanarCoord::new(
            float_field(&fields, 0, &what)?,
            float_field(&fields, 1, &what)?,
        ));
    }

    let mut cells = Vec::with_capacity(cell_rows);
    for i in 0..cell_rows {
        let mut row = Vec::with_capacity(cell_cols);
        for j in 0..cell_cols {
            let what = format!("cell ({i}, {j})");
            let fields = next_fields(&mut lines, 1, &what)?;
            let code = float_field(&fields, 0, &what)?;
            let shape = if code < 0.0 {
                CellShape::NegativeSlope
            } else if code > 0.0 {
                CellShape::PositiveSlope
            } else {
                CellShape::Quad
            };
            let count = match shape {
                CellShape::Quad => 4,
                _ => 6,
            };
            if fields.len() < 1 + count {
                return Err(format!(
                    "{} line has {} fields, expected {}",
                    what,
                    fields.len(),
                    1 + count
                ));
            }
            let mut cell_verts = Vec::with_capacity(count);
            for k in 0..count {
                cell_verts.push(verts[index_field(&fields, 1 + k, num_verts, &what)?]);
            }
            row.push(Cell {
                shape,
                verts: cell_verts,
            });
        }
        cells.push(row);
    }

    let mut edge = Vec::with_capacity(num_edge);
    for e in 0..num_edge {
        let what = format!("edge vertex {e}");
        let fields = next_fields(&mut lines, 1, &what)?;
        edge.push(verts[index_field(&fields, 0, num_verts, &what)?]);
    }

    let mut pixels = Vec::with_capacity(pix_rows);
    for i in 0..pix_rows {
        let mut row = Vec::with_capacity(pix_cols);
        for j in 0..pix_cols {
            let what = format!("pixel ({i}, {j})");
            let fields = next_fields(&mut lines, 2, &what)?;
            let lat = float_field(&fields, 0, &what)?;
            if lat.abs() > HALF_PI + 1e-9 {
                return Err(format!("{what} latitude {lat} is out of range"));
            }
            row.push(SphericalCoord::new(lat, float_field(&fields, 1, &what)?));
        }
        pixels.push(row);
    }

    Ok(MeshData {
        width,
        height,
        cells,
        edge,
        pixels,
    })
}
