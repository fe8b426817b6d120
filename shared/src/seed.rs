//! Seed dataset
//!
//! What a device shows before the remote store answers, and what an empty
//! remote path gets initialized with.

use rust_decimal::Decimal;

use crate::models::{Menu, MenuItem, Role, Table, User};

pub const CAT_BREAKFAST: &str = "ארוחות בוקר";
pub const CAT_SALADS: &str = "סלטים";
pub const CAT_MAINS: &str = "עיקריות (פסטות)";
pub const CAT_SANDWICHES: &str = "כריכים";
pub const CAT_TOASTS: &str = "טוסטים";
pub const CAT_STARTERS: &str = "ראשונות";
pub const CAT_COLD_DRINKS: &str = "שתיה קרה";
pub const CAT_HOT_DRINKS: &str = "שתיה חמה";

fn item(
    id: &str,
    name: &str,
    price: i64,
    category: &str,
    description: Option<&str>,
    terms: &[&str],
) -> MenuItem {
    let mut item = MenuItem::new(id, name, Decimal::from(price), category)
        .with_search_terms(terms.iter().copied());
    item.description = description.map(str::to_string);
    item
}

/// The fixed floor layout, every table FREE
pub fn default_tables() -> Vec<Table> {
    [
        (1, "שולחן 1"),
        (2, "שולחן 2"),
        (3, "שולחן 3"),
        (4, "שולחן 4"),
        (5, "שולחן 5"),
        (6, "מרפסת 1"),
        (7, "מרפסת 2"),
        (8, "בר 1"),
        (9, "בר 2"),
        (10, "ספה 1"),
    ]
    .into_iter()
    .map(|(id, name)| Table::new(id, name))
    .collect()
}

pub fn default_users() -> Vec<User> {
    let user = |id: &str, name: &str, role, pin: &str| User {
        id: id.into(),
        name: name.into(),
        role,
        pin: pin.into(),
        is_active: true,
    };
    vec![
        user("u1", "מנהל ראשי", Role::Admin, "1234"),
        user("u2", "שוהם", Role::Waiter, "1111"),
        user("u3", "אביה", Role::Waiter, "2222"),
    ]
}

pub fn default_menus() -> Vec<Menu> {
    let items = vec![
        // Breakfast
        item("b1", "ארוחת בוקר יחיד", 72, CAT_BREAKFAST,
            Some("סלט אישי, 5 מטבלים לבחירה, ביצה לבחירה, לחמניה וחמאה, מיץ תפוזים/לימונדה, שתיה חמה"),
            &["ביצים", "חביתה", "בוקר", "קפה"]),
        item("b2", "ארוחת בוקר זוגית", 148, CAT_BREAKFAST,
            Some("2 סלט אישי, כל המטבלים, 2 ביצים לבחירה, 2 לחמניות וחמאה, 2 מיץ, 2 שתיה חמה"),
            &["ביצים", "חביתה", "זוגי", "שקשוקה"]),
        // Salads
        item("s1", "סלט הבית", 69, CAT_SALADS,
            Some("חסה, עגבניות, מלפפון, צ׳יפס בטטה, קוביות בטטה מקורמלת, בצל סגול, נבטי חמניה, גבינת מוצרלה מוקפצת + רוטב ויניגרט"),
            &["ירקות", "בריאות", "מוצרלה"]),
        item("s2", "סלט כפרי", 69, CAT_SALADS,
            Some("חסה, עגבניות, מלפפון, צ׳יפס בטטה, בטטה מקורמלת, עלי בייבי, בצל סגול, סלק טרי, שקדים, חמניה, בוטנים, חמוציות + רוטב ויניגרט מתקתק"),
            &["ירקות", "בריאות", "אגוזים"]),
        item("s3", "סלט יווני", 69, CAT_SALADS,
            Some("עגבניות, מלפפון, גמבה, בצל סגול, צנונית, זיתי קלמטה, בולגרית (פטה), בתיבול שמן זית, לימון וזעתר"),
            &["בולגרית", "גבינה", "זיתים"]),
        item("s4", "סלט סביח", 71, CAT_SALADS,
            Some("חסה, עגבניות, מלפפון, חמוץ, ביצה קשה, גרעיני חומוס, תפו״א + אריסה, חצילים מטוגנים, פטרוזיליה על מצע טחינה"),
            &["חציל", "טחינה", "ביצה"]),
        item("s5", "סלט עדשים ובטטה", 70, CAT_SALADS,
            Some("עדשים, בולגרית (פטה), בטטה מקורמלת, עלי בייבי, חסה, בצל סגול + רוטב ויניגרט"),
            &["בריאות", "קטניות"]),
        item("s6", "סלט קינואה", 69, CAT_SALADS,
            Some("קינואה לבנה ואדומה, בטטה מקורמלת, סלק מגורד, עלי בייבי, חסה, בצל סגול, גרעיני חמניה ושקדים + רוטב ויניגרט"),
            &["טבעוני", "בריאות", "סופר פוד"]),
        // Mains / pasta
        item("p1", "פסטה (פנה) עגבניות", 59, CAT_MAINS,
            Some("ברוטב עגבניות טריות, בניחוח בזיליקום ושמן זית"),
            &["איטלקי", "פמודורו", "ילדים"]),
        item("p2", "פסטה (פוטוצ׳יני) שמנת פטריות", 62, CAT_MAINS,
            Some("ברוטב שמנת ופטריות, מוגש עם גבינת פרמז׳ן מגורדת"),
            &["איטלקי", "אלפרדו", "חלבי"]),
        item("p3", "פסטה (פוטוצ׳יני) רוזה", 64, CAT_MAINS,
            Some("עגבניות טריות, בזיליקום ורוטב שמנת, מוגש עם גבינת פרמז׳ן מגורדת"),
            &["איטלקי", "שמנת עגבניות"]),
        item("p4", "פסטה (פוטוצ׳יני) שמנת פסטו", 64, CAT_MAINS,
            Some("מוגש עם גבינת פרמז׳ן מגורדת"),
            &["איטלקי", "ירוק", "בזיליקום"]),
        item("p5", "רביולי (בטטה/גבינות)", 70, CAT_MAINS,
            Some("ברוטב שמנת ופטריות, מוגש עם גבינת פרמז׳ן מגורדת"),
            &["ממולא", "איטלקי"]),
        item("p6", "לזניה חצילים ועגבניות", 70, CAT_MAINS,
            Some("עם רוטב עגבניות ורוטב שמנת, חצילים וגבינה צהובה מגורדת"),
            &["מאפה", "איטלקי"]),
        item("p7", "תפוח אדמה מוקרם", 62, CAT_MAINS,
            Some("ברוטב שמנת ופטריות וגבינה צהובה"),
            &["גראטן", "תפו\"א"]),
        item("p8", "קיש בטטה/פטריות", 57, CAT_MAINS,
            Some("קיש פטריות בליווי סלט אישי וגבינת שמנת (ביתית)"),
            &["מאפה", "פאי"]),
        item("p9", "שקשוקה עגבניות", 69, CAT_MAINS,
            Some("מעגבניות טריות עם 2 ביצים. מוגש עם סלט אישי, טחינה, זיתי קלמטה ולחמניה לבחירה"),
            &["ביצים", "פיקנטי"]),
        item("p10", "שקשוקה תרד", 73, CAT_MAINS,
            Some("תבשיל תרד ורוטב שמנת, גבינת עיזים ו-2 ביצים, מוגש עם סלט אישי, ג.שמנת, זיתים ולחמניה"),
            &["ירוקה", "ביצים"]),
        item("p11", "פיש & צ׳יפס", 73, CAT_MAINS,
            Some("בליווי קטשופ, רוטב שום ופלח לימון"),
            &["דג", "מטוגן"]),
        item("p12", "מרק היום", 46, CAT_MAINS,
            Some("(בחורף) מוגש עם לחם וחמאה"),
            &["חם", "ירקות", "כתום"]),
        // Sandwiches
        item("sw1", "כריך בלקני גבינת שמנת", 53, CAT_SANDWICHES,
            Some("שמנת ביתית, פסטו, חציל, בולגרית, עגבניה, פלפל קלוי, בייבי, זיתים (מוגש בליווי סלט)"),
            &["לחם", "גבינה"]),
        item("sw2", "כריך סלמון מעושן", 55, CAT_SANDWICHES,
            Some("שמנת ביתית, סלמון מעושן, אבוקדו (בעונה), צלפים, מלפפונים, בצל סגול, בייבי ושמיר"),
            &["דג", "לחם"]),
        item("sw3", "כריך סביח טחינה", 53, CAT_SANDWICHES,
            Some("חציל, ביצה קשה, מלפפון חמוץ, גמבות, עגבניות, תפו״א, אריסה ופטרוזיליה"),
            &["חצילים", "ביצה"]),
        item("sw4", "כריך עיזים", 54, CAT_SANDWICHES,
            Some("שמנת ביתית, פסטו, סלק מבושל, חציל, גבינת עיזים, בייבי, בצל סגול, סלק טרי"),
            &["גבינה", "לחם"]),
        // Toasts
        item("t1", "טוסט קלאסי", 54, CAT_TOASTS,
            Some("רוטב עגבניות, פסטו, גבינה צהובה, בולגרית פטה, בצל סגול, עגבניה, זיתים"),
            &["בייגל", "מוצרלה"]),
        item("t2", "טוסט בלקני", 54, CAT_TOASTS,
            Some("גבינת שמנת, פסטו, גבינה צהובה, בולגרית פטה, בצל סגול, פטריות טריות"),
            &["בייגל", "פטריות"]),
        item("t3", "טוסט ירושלמי", 54, CAT_TOASTS,
            Some("רוטב עגבניות, גבינה צהובה, ביצה קשה, זיתים, עגבניה, בצל סגול"),
            &["בייגל", "ביצה"]),
        // Starters
        item("st1", "פוקצ׳ה ומטבלים", 39, CAT_STARTERS,
            Some("פסטו, עגבניות מבושלות, טחינה"),
            &["לחם", "מאפה"]),
        item("st2", "קסדייה", 46, CAT_STARTERS,
            Some("טורטיות קלויות על המחבת, במילוי גבינות וקוביות בטטה + סלסה עגבניות ורוטב שום"),
            &["מקסיקני", "טוסט"]),
        item("st3", "לביבות קינואה/עדשים", 51, CAT_STARTERS,
            Some("בליווי רוטב צזיקי (יוגורט, מלפפונים ושמיר)"),
            &["טבעוני", "בריאות"]),
        // Drinks
        item("d1", "קוקה קולה", 14, CAT_COLD_DRINKS, None, &["מוגז", "סודה"]),
        item("d2", "קולה זירו", 14, CAT_COLD_DRINKS, None, &["מוגז", "דיאט", "ללא סוכר"]),
        item("d3", "לימונדה גרוסה", 18, CAT_COLD_DRINKS, None, &["מיץ", "ברד"]),
        item("d4", "תפוזים סחוט", 18, CAT_COLD_DRINKS, None, &["מיץ", "טבעי"]),
        item("h1", "הפוך", 15, CAT_HOT_DRINKS, None, &["קפה", "חלב", "קפוצ'ינו", "נס"]),
        item("h2", "אספרסו", 11, CAT_HOT_DRINKS, None, &["קפה", "קצר", "ארוך", "כפול"]),
        item("h3", "תה צמחים", 12, CAT_HOT_DRINKS, None, &["חליטה", "נענע", "מים"]),
    ];

    vec![Menu {
        id: "main_menu".into(),
        name: "התפריט של איילה".into(),
        is_active: true,
        categories: [
            CAT_BREAKFAST,
            CAT_SALADS,
            CAT_MAINS,
            CAT_SANDWICHES,
            CAT_TOASTS,
            CAT_STARTERS,
            CAT_COLD_DRINKS,
            CAT_HOT_DRINKS,
        ]
        .iter()
        .map(|c| c.to_string())
        .collect(),
        items,
    }]
}
