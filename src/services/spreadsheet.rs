use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::domain::product::Product;

const HEADERS: [&str; 4] = ["title", "price", "rating", "description"];

pub fn export_products(products: &[Product], path: &Path) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (index, product) in products.iter().enumerate() {
        let row = index as u32 + 1;
        worksheet.write_string(row, 0, &product.title)?;
        worksheet.write_number(row, 1, product.price)?;
        worksheet.write_number(row, 2, product.rating)?;
        worksheet.write_string(row, 3, &product.description)?;
    }

    workbook.save(path)?;
    log::info!("Data saved to {}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::export_products;
    use crate::domain::product::Product;

    #[test]
    fn export_products_writes_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.xlsx");
        let products = vec![Product {
            title: "Acer Aspire 3".to_string(),
            price: 494.71,
            rating: 4.2,
            description: "Acer Aspire 3 A315-31 Black, 15.6\"".to_string(),
        }];

        export_products(&products, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK"), "xlsx files are zip archives");
    }

    #[test]
    fn export_products_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("products.xlsx");

        assert!(export_products(&[], &path).is_err());
    }
}
