//! Server-rendered listing page.

use std::fmt::Write;

use crate::config::APP_NAME;
use crate::models::DebrisRecord;

use super::flash::Flash;

/// Escape text for HTML element content and double-quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Full page: optional flash, submission form, then every record in
/// storage order.
pub fn render_listing(records: &[DebrisRecord], flash: Option<Flash>) -> String {
    let mut html = String::with_capacity(PAGE_HEAD.len() + 512 * (records.len() + 1));
    html.push_str(PAGE_HEAD);

    let _ = writeln!(html, "<h1>{}</h1>", escape_html(APP_NAME));

    if let Some(flash) = flash {
        let _ = writeln!(
            html,
            "<div class=\"flash {}\">{}</div>",
            flash.level().css_class(),
            escape_html(flash.message())
        );
    }

    html.push_str(SUBMIT_FORM);

    if records.is_empty() {
        html.push_str("<p class=\"empty\">No debris reported yet.</p>\n");
    } else {
        html.push_str(TABLE_HEAD);
        for record in records {
            render_row(&mut html, record);
        }
        html.push_str("</tbody>\n</table>\n");
    }

    html.push_str(PAGE_FOOT);
    html
}

fn render_row(html: &mut String, record: &DebrisRecord) {
    let image = match record.file_name() {
        Some(name) => format!(
            "<img src=\"/uploads/{}\" alt=\"Debris photo {}\">",
            escape_html(name),
            record.id
        ),
        None => String::new(),
    };

    let _ = write!(
        html,
        "<tr>\
         <td>{id}</td>\
         <td>{image}</td>\
         <td>{categories}</td>\
         <td>{lat}, {lon}</td>\
         <td>{country}</td>\
         <td>{description}</td>\
         <td>{created}</td>\
         </tr>\n",
        id = record.id,
        categories = escape_html(&record.category_list().join(", ")),
        lat = record.gps_lat,
        lon = record.gps_lon,
        country = escape_html(&record.country),
        description = escape_html(&record.description),
        created = record.created_at.format("%Y-%m-%d %H:%M:%S"),
    );
}

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Marine Debris Reporter</title>
  <style>
    body { font-family: system-ui, sans-serif; margin: 24px; color: #1c1917; background: #f8fafc; }
    h1 { color: #0c4a6e; }
    form { background: #fff; padding: 16px; border-radius: 8px; margin-bottom: 24px; max-width: 480px; }
    label { display: block; margin-top: 8px; font-weight: 600; }
    input, textarea { width: 100%; padding: 6px; margin-top: 4px; }
    button { margin-top: 12px; padding: 8px 16px; background: #0369a1; color: #fff; border: 0; border-radius: 4px; }
    .flash { padding: 10px 14px; border-radius: 6px; margin-bottom: 16px; }
    .flash.success { background: #dcfce7; color: #166534; }
    .flash.error { background: #fee2e2; color: #991b1b; }
    table { border-collapse: collapse; width: 100%; background: #fff; }
    th, td { border: 1px solid #e2e8f0; padding: 6px 8px; text-align: left; vertical-align: top; }
    img { max-width: 160px; max-height: 120px; }
    .empty { color: #64748b; }
  </style>
</head>
<body>
"#;

const SUBMIT_FORM: &str = r#"<form action="/submit" method="post" enctype="multipart/form-data">
  <label for="photo">Photo</label>
  <input type="file" id="photo" name="photo" accept=".png,.jpg,.jpeg,.gif">
  <label for="description">Description</label>
  <textarea id="description" name="description" rows="3"></textarea>
  <label for="lat">Latitude</label>
  <input type="text" id="lat" name="lat">
  <label for="lon">Longitude</label>
  <input type="text" id="lon" name="lon">
  <button type="submit">Report debris</button>
</form>
"#;

const TABLE_HEAD: &str = r#"<table>
<thead>
<tr><th>ID</th><th>Photo</th><th>Categories</th><th>GPS</th><th>Country</th><th>Description</th><th>Reported</th></tr>
</thead>
<tbody>
"#;

const PAGE_FOOT: &str = "</body>\n</html>\n";
