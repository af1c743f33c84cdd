use crate::query::ast::copy::Copy;
use crate::query::renderer::Render;

impl Render for Copy {
    fn render(&self, r: &mut super::Renderer) {
        r.sql.push_str("COPY ");
        r.render_table_ref(&self.table);
        r.sql.push_str(" FROM ");
        r.render_literal(&self.source);
        r.render_credentials(&self.credentials);
        r.render_options(&self.options);
        r.sql.push(';');
    }
}
