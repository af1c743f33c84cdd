use crate::query::{
    ast::unload::Unload,
    renderer::{Render, Renderer},
};

impl Render for Unload {
    fn render(&self, r: &mut Renderer) {
        let select = format!("SELECT * FROM {}", r.dialect.table_name(&self.table));

        r.sql.push_str("UNLOAD (");
        r.render_literal(&select);
        r.sql.push_str(") TO ");
        r.render_literal(&self.target);
        r.render_credentials(&self.credentials);
        r.render_options(&self.options);
        r.sql.push(';');
    }
}
