// message.rs — The fixed renewal notification template.
//
// One template, one notification type per run. Composition is a pure
// function of (name, supply id) so outcomes are reproducible in tests
// without a channel.

/// The notification type recorded for every outcome of a renewal run.
pub const NOTIFICATION_TYPE: &str = "Renovación - DI Vencida";

/// Render the renewal message for one beneficiary. Missing fields render as
/// the operational placeholders rather than failing: name → "Usuario",
/// supply id → "S/D".
pub fn compose_renewal_message(name: Option<&str>, supply_id: Option<&str>) -> String {
    let name = name.unwrap_or("Usuario");
    let supply_id = supply_id.unwrap_or("S/D");

    format!(
        "Buenas tardes, *Señor/a {name}*, usuario del *suministro N° {supply_id}*:\n\
         \n\
         Nos comunicamos desde el *EPRE Mendoza* para informarle que, tras NO haber recibido \
         en los últimos 6 meses documentación a nivel provincial para el beneficio de \
         *Electrodependencia por Cuestiones de Salud*, hemos advertido la falta de documentación \
         actualizada.\n\
         \n\
         Por lo expuesto, le informamos que deberá *realizar el trámite en el sistema TAD como \
         una RENOVACIÓN*, incluyendo *toda la documentación necesaria* y asegurándose de \
         iniciarlo correctamente. Una vez realizado, deberá enviarnos la *carátula del trámite*, \
         así como también la documentación que haya subido al sistema TAD.\n\
         \n\
         En caso de ya haber realizado el trámite en el sistema TAD, le solicitamos que nos \
         envíe la carátula del mismo junto con la documentación que cargó oportunamente en el \
         sistema TAD.\n\
         \n\
         Ante cualquier duda, puede comunicarse por este medio o acercarse a nuestras oficinas:\n\
         \n\
         \u{20}\u{20}*- San Martín 285, Ciudad de Mendoza*\n\
         \u{20}\u{20}*- Bombal 283, San Rafael*\n\
         \n\
         Es importante que complete este proceso para continuar recibiendo el beneficio. Para \
         ello, dispone de un plazo de *60 días*. En caso de necesitar una extensión por alguna \
         razón particular, por favor háganoslo saber.\n\
         \n\
         *¡Muchas gracias!*"
    )
}
