use crate::error::TemplateError;

/// Template de comando ya validado: exactamente un `{}`.
///
/// `{{` y `}}` se renderizan como llaves literales; cualquier otra llave
/// se copia tal cual (ej: `awk '{print $1}' {}`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    prefix: String,
    suffix: String,
}

impl CommandTemplate {
    pub fn parse(template: &str) -> Result<Self, TemplateError> {
        let mut prefix = String::new();
        let mut suffix = String::new();
        let mut found = 0usize;

        let mut chars = template.chars().peekable();
        while let Some(c) = chars.next() {
            let next = chars.peek().copied();
            let literal = match (c, next) {
                ('{', Some('}')) => {
                    chars.next();
                    found += 1;
                    continue;
                }
                ('{', Some('{')) | ('}', Some('}')) => {
                    chars.next();
                    c
                }
                _ => c,
            };

            if found == 0 {
                prefix.push(literal);
            } else {
                suffix.push(literal);
            }
        }

        match found {
            0 => Err(TemplateError::NoPlaceholder),
            1 => Ok(Self { prefix, suffix }),
            n => Err(TemplateError::TooManyPlaceholders { found: n }),
        }
    }

    /// Sustituye el target (ya escapado para el shell) en el placeholder.
    pub fn render(&self, target: &str) -> Result<String, TemplateError> {
        if target.contains('\0') {
            return Err(TemplateError::NulInTarget);
        }
        let quoted = shell_quote(target);

        let mut out = String::with_capacity(self.prefix.len() + quoted.len() + self.suffix.len());
        out.push_str(&self.prefix);
        out.push_str(&quoted);
        out.push_str(&self.suffix);
        Ok(out)
    }
}

/// Escapa un string para usarlo como UNA palabra en `sh`.
///
/// Si sólo tiene caracteres seguros se deja igual; si no, se envuelve en
/// comillas simples y cada `'` interna pasa a `'"'"'`.
pub fn shell_quote(s: &str) -> String {
    if s.is_empty() {
        return "''".to_string();
    }

    let safe = s
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "@%+=:,./_-".contains(c));
    if safe {
        return s.to_string();
    }

    format!("'{}'", s.replace('\'', r#"'"'"'"#))
}
