use derive_new::new;

#[derive(Debug, Clone, new)]
pub struct CreateVisitor {
    pub name: String,
    pub email: Option<String>,
    pub whatsapp: Option<String>,
}
