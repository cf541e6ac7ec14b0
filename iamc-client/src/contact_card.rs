//! Employee contact card
//!
//! Self-contained renderings of one employee record: an HTML fragment with
//! inline styles and a vCard 3.0. Every field is escaped for its target
//! format, so record content is never interpreted as markup.

use shared::models::Funcionario;

/// Escape text for HTML element content and quoted attribute values
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// vCard text value escaping (RFC 6350 section 3.4)
fn escape_vcard(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ',' => out.push_str("\\,"),
            ';' => out.push_str("\\;"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

fn row(label: &str, value: Option<&str>) -> String {
    match value.filter(|v| !v.trim().is_empty()) {
        Some(v) => format!(
            "<tr><th style=\"text-align:left;padding-right:8px\">{}</th><td>{}</td></tr>",
            escape_html(label),
            escape_html(v)
        ),
        None => String::new(),
    }
}

pub fn render_html(employee: &Funcionario) -> String {
    let admission = employee.data_admissao.format("%d/%m/%Y").to_string();
    let rows = [
        row("BI", Some(&employee.bi)),
        row("Email", employee.email.as_deref()),
        row("Telefone", employee.telefone.as_deref()),
        row("Endereco", employee.endereco.as_deref()),
        row("Admissao", Some(&admission)),
    ]
    .concat();

    format!(
        "<div class=\"iamc-card\" style=\"font-family:sans-serif;border:1px solid #ccc;border-radius:8px;padding:12px;max-width:320px\">\
         <h3 style=\"margin:0 0 8px\">{name}</h3>\
         <p style=\"margin:0 0 8px;color:#666\">N.º {id}</p>\
         <table>{rows}</table>\
         </div>",
        name = escape_html(&employee.full_name()),
        id = employee.id,
    )
}

pub fn render_vcard(employee: &Funcionario) -> String {
    let mut lines = vec![
        "BEGIN:VCARD".to_string(),
        "VERSION:3.0".to_string(),
        format!(
            "N:{};{};;;",
            escape_vcard(&employee.sobrenome),
            escape_vcard(&employee.nome)
        ),
        format!("FN:{}", escape_vcard(&employee.full_name())),
        "ORG:IAMC".to_string(),
    ];
    if let Some(email) = employee.email.as_deref().filter(|e| !e.is_empty()) {
        lines.push(format!("EMAIL;TYPE=work:{}", escape_vcard(email)));
    }
    if let Some(phone) = employee.telefone.as_deref().filter(|p| !p.is_empty()) {
        lines.push(format!("TEL;TYPE=work:{}", escape_vcard(phone)));
    }
    if let Some(address) = employee.endereco.as_deref().filter(|a| !a.is_empty()) {
        lines.push(format!("ADR;TYPE=work:;;{};;;;", escape_vcard(address)));
    }
    lines.push(format!("UID:iamc-funcionario-{}", employee.id));
    lines.push("END:VCARD".to_string());

    let mut out = lines.join("\r\n");
    out.push_str("\r\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo;

    #[test]
    fn test_markup_in_fields_is_escaped() {
        let mut f = demo::funcionarios().remove(0);
        f.nome = "<script>alert('x')</script>".to_string();
        f.endereco = Some("Rua \"A\" & B".to_string());

        let html = render_html(&f);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
        assert!(html.contains("Rua &quot;A&quot; &amp; B"));
    }

    #[test]
    fn test_empty_fields_are_skipped() {
        let mut f = demo::funcionarios().remove(1);
        f.telefone = None;
        f.email = Some(String::new());
        let html = render_html(&f);
        assert!(!html.contains("Telefone"));
        assert!(!html.contains("Email"));
        assert!(html.contains(&f.full_name()));
    }

    #[test]
    fn test_vcard_escaping_and_shape() {
        let mut f = demo::funcionarios().remove(0);
        f.endereco = Some("Av. 4 de Fevereiro, 12; Luanda".to_string());
        let card = render_vcard(&f);
        assert!(card.starts_with("BEGIN:VCARD\r\nVERSION:3.0\r\n"));
        assert!(card.ends_with("END:VCARD\r\n"));
        assert!(card.contains("N:Silva;Ana;;;"));
        assert!(card.contains("Av. 4 de Fevereiro\\, 12\\; Luanda"));
    }
}
