//! Centralized localized strings for all user-facing console messages.
//!
//! Every key exists in all three catalogs. Templates may carry `{name}`
//! placeholders filled in by [`translate`].

use crate::i18n::Language;
use crate::users::Role;

/// Symbolic key for a localized string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranslationKey {
    // Authentication
    Login,
    Email,
    Password,
    LoginSuccessful,
    LoginError,

    // User management feedback
    DataRefreshed,
    UserCreated,
    UserUpdated,
    UserDeleted,
    UserDeleteError,
    FetchUsersError,
    ConfirmDelete,
    ConfirmDeleteMessage,

    // Backend error conditions with dedicated wording
    DatabaseFunctionError,
    PermissionDenied,
    SupabaseAmbiguousIdError,
    AppsScriptCorsError,
    DuplicateEmailError,
    ProvisioningError,

    // Client-side validation
    NameRequired,
    EmailRequired,
    PasswordTooShort,
    CompanyRequired,

    // Reports
    ReportsRefreshed,
    FetchReportsError,
    NoReportsFound,
    ErrorLoadingReports,
    RetryLoad,
    TotalReports,
    AcceptableReports,
    NotAcceptableReports,
    ClosedReports,
    Acceptable,
    NotAcceptable,
    Closed,
    Pending,

    // User list
    TotalUsers,
    ActiveUsers,
    RoleDistribution,
    NoDataFound,
    AllRoles,
    AllCompanies,
    Active,
    Inactive,

    // Role labels
    RoleAdmin,
    RoleCoordinator,
    RoleSstSpecialist,
    RoleNurse,
    RoleEmployee,
}

impl TranslationKey {
    /// Label key for a profile role.
    pub fn for_role(role: Role) -> TranslationKey {
        match role {
            Role::Admin => TranslationKey::RoleAdmin,
            Role::Coordinator => TranslationKey::RoleCoordinator,
            Role::SstSpecialist => TranslationKey::RoleSstSpecialist,
            Role::Nurse => TranslationKey::RoleNurse,
            Role::Employee => TranslationKey::RoleEmployee,
        }
    }
}

/// Resolve a key to its raw (possibly templated) string in the given language.
pub fn resolve(language: Language, key: TranslationKey) -> &'static str {
    match language.code() {
        "en" => english(key),
        "zh" => chinese(key),
        _ => spanish(key),
    }
}

/// Resolve a key and substitute `{name}` placeholders with the given values.
///
/// Unknown placeholders are left untouched; extra parameters are ignored.
pub fn translate(language: Language, key: TranslationKey, params: &[(&str, &str)]) -> String {
    let mut text = resolve(language, key).to_string();
    for (name, value) in params {
        text = text.replace(&format!("{{{}}}", name), value);
    }
    text
}

fn spanish(key: TranslationKey) -> &'static str {
    use TranslationKey::*;
    match key {
        Login => "Iniciar sesión",
        Email => "Correo electrónico",
        Password => "Contraseña",
        LoginSuccessful => "Sesión iniciada exitosamente",
        LoginError => "Error al iniciar sesión",

        DataRefreshed => "Datos actualizados",
        UserCreated => "Usuario creado exitosamente",
        UserUpdated => "Usuario actualizado exitosamente",
        UserDeleted => "Usuario eliminado exitosamente",
        UserDeleteError => "Error al eliminar usuario",
        FetchUsersError => "Error al obtener usuarios",
        ConfirmDelete => "Confirmar eliminación",
        ConfirmDeleteMessage => "¿Estás seguro de que deseas eliminar a {userName}?",

        DatabaseFunctionError => {
            "La función de base de datos no está disponible. Contacta al administrador."
        }
        PermissionDenied => "No tienes permisos suficientes para esta operación.",
        SupabaseAmbiguousIdError => {
            "Error de identificador ambiguo en la consulta de usuarios."
        }
        AppsScriptCorsError => "No se pudo conectar con el servicio de reportes.",
        DuplicateEmailError => "Ya existe un usuario con este email. Usa un email diferente.",
        ProvisioningError => "La función de creación no está disponible. Contacta al administrador.",

        NameRequired => "El nombre es requerido",
        EmailRequired => "El email es requerido",
        PasswordTooShort => "La contraseña debe tener al menos 6 caracteres",
        CompanyRequired => "La empresa es requerida",

        ReportsRefreshed => "Reportes actualizados",
        FetchReportsError => "Error al obtener reportes",
        NoReportsFound => "No se encontraron reportes",
        ErrorLoadingReports => "Error al cargar los reportes",
        RetryLoad => "Reintentar",
        TotalReports => "Total de reportes",
        AcceptableReports => "Reportes aceptables",
        NotAcceptableReports => "Reportes no aceptables",
        ClosedReports => "Reportes cerrados",
        Acceptable => "Aceptable",
        NotAcceptable => "No aceptable",
        Closed => "Cerrado",
        Pending => "Pendiente",

        TotalUsers => "Total de usuarios",
        ActiveUsers => "Usuarios activos",
        RoleDistribution => "Distribución de roles",
        NoDataFound => "Sin datos",
        AllRoles => "Todos los roles",
        AllCompanies => "Todas las empresas",
        Active => "Activo",
        Inactive => "Inactivo",

        RoleAdmin => "Administrador",
        RoleCoordinator => "Coordinador",
        RoleSstSpecialist => "Especialista SST",
        RoleNurse => "Enfermero/a",
        RoleEmployee => "Empleado",
    }
}

fn english(key: TranslationKey) -> &'static str {
    use TranslationKey::*;
    match key {
        Login => "Sign in",
        Email => "Email",
        Password => "Password",
        LoginSuccessful => "Signed in successfully",
        LoginError => "Sign-in failed",

        DataRefreshed => "Data refreshed",
        UserCreated => "User created successfully",
        UserUpdated => "User updated successfully",
        UserDeleted => "User deleted successfully",
        UserDeleteError => "Failed to delete user",
        FetchUsersError => "Failed to fetch users",
        ConfirmDelete => "Confirm deletion",
        ConfirmDeleteMessage => "Are you sure you want to delete {userName}?",

        DatabaseFunctionError => {
            "The database function is not available. Contact your administrator."
        }
        PermissionDenied => "You do not have sufficient permissions for this operation.",
        SupabaseAmbiguousIdError => "Ambiguous identifier error in the user query.",
        AppsScriptCorsError => "Could not reach the reports service.",
        DuplicateEmailError => "A user with this email already exists. Use a different email.",
        ProvisioningError => "The creation function is not available. Contact your administrator.",

        NameRequired => "Name is required",
        EmailRequired => "Email is required",
        PasswordTooShort => "Password must be at least 6 characters",
        CompanyRequired => "Company is required",

        ReportsRefreshed => "Reports refreshed",
        FetchReportsError => "Failed to fetch reports",
        NoReportsFound => "No reports found",
        ErrorLoadingReports => "Error loading reports",
        RetryLoad => "Retry",
        TotalReports => "Total reports",
        AcceptableReports => "Acceptable reports",
        NotAcceptableReports => "Not acceptable reports",
        ClosedReports => "Closed reports",
        Acceptable => "Acceptable",
        NotAcceptable => "Not acceptable",
        Closed => "Closed",
        Pending => "Pending",

        TotalUsers => "Total users",
        ActiveUsers => "Active users",
        RoleDistribution => "Role distribution",
        NoDataFound => "No data",
        AllRoles => "All roles",
        AllCompanies => "All companies",
        Active => "Active",
        Inactive => "Inactive",

        RoleAdmin => "Administrator",
        RoleCoordinator => "Coordinator",
        RoleSstSpecialist => "SST Specialist",
        RoleNurse => "Nurse",
        RoleEmployee => "Employee",
    }
}

fn chinese(key: TranslationKey) -> &'static str {
    use TranslationKey::*;
    match key {
        Login => "登录",
        Email => "电子邮箱",
        Password => "密码",
        LoginSuccessful => "登录成功",
        LoginError => "登录失败",

        DataRefreshed => "数据已刷新",
        UserCreated => "用户创建成功",
        UserUpdated => "用户更新成功",
        UserDeleted => "用户删除成功",
        UserDeleteError => "删除用户失败",
        FetchUsersError => "获取用户失败",
        ConfirmDelete => "确认删除",
        ConfirmDeleteMessage => "确定要删除 {userName} 吗？",

        DatabaseFunctionError => "数据库函数不可用，请联系管理员。",
        PermissionDenied => "您没有足够的权限执行此操作。",
        SupabaseAmbiguousIdError => "用户查询中出现标识符歧义错误。",
        AppsScriptCorsError => "无法连接到报告服务。",
        DuplicateEmailError => "该电子邮箱已被注册，请使用其他邮箱。",
        ProvisioningError => "创建功能不可用，请联系管理员。",

        NameRequired => "姓名为必填项",
        EmailRequired => "电子邮箱为必填项",
        PasswordTooShort => "密码至少需要6个字符",
        CompanyRequired => "公司为必填项",

        ReportsRefreshed => "报告已刷新",
        FetchReportsError => "获取报告失败",
        NoReportsFound => "未找到报告",
        ErrorLoadingReports => "加载报告时出错",
        RetryLoad => "重试",
        TotalReports => "报告总数",
        AcceptableReports => "可接受的报告",
        NotAcceptableReports => "不可接受的报告",
        ClosedReports => "已关闭的报告",
        Acceptable => "可接受",
        NotAcceptable => "不可接受",
        Closed => "已关闭",
        Pending => "待处理",

        TotalUsers => "用户总数",
        ActiveUsers => "活跃用户",
        RoleDistribution => "角色分布",
        NoDataFound => "暂无数据",
        AllRoles => "所有角色",
        AllCompanies => "所有公司",
        Active => "活跃",
        Inactive => "已停用",

        RoleAdmin => "管理员",
        RoleCoordinator => "协调员",
        RoleSstSpecialist => "SST专员",
        RoleNurse => "护士",
        RoleEmployee => "员工",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Resolve Tests ====================

    #[test]
    fn test_resolve_spanish() {
        assert_eq!(
            resolve(Language::SPANISH, TranslationKey::DataRefreshed),
            "Datos actualizados"
        );
    }

    #[test]
    fn test_resolve_english() {
        assert_eq!(
            resolve(Language::ENGLISH, TranslationKey::DataRefreshed),
            "Data refreshed"
        );
    }

    #[test]
    fn test_resolve_chinese() {
        assert_eq!(
            resolve(Language::CHINESE, TranslationKey::DataRefreshed),
            "数据已刷新"
        );
    }

    #[test]
    fn test_all_catalogs_are_non_empty() {
        use TranslationKey::*;
        let keys = [
            Login, Email, Password, LoginSuccessful, LoginError, DataRefreshed,
            UserCreated, UserUpdated, UserDeleted, UserDeleteError, FetchUsersError,
            ConfirmDelete, ConfirmDeleteMessage, DatabaseFunctionError, PermissionDenied,
            SupabaseAmbiguousIdError, AppsScriptCorsError, DuplicateEmailError,
            ProvisioningError, NameRequired, EmailRequired, PasswordTooShort,
            CompanyRequired, ReportsRefreshed, FetchReportsError, NoReportsFound,
            ErrorLoadingReports, RetryLoad, TotalReports, AcceptableReports,
            NotAcceptableReports, ClosedReports, Acceptable, NotAcceptable, Closed,
            Pending, TotalUsers, ActiveUsers, RoleDistribution, NoDataFound, AllRoles,
            AllCompanies, Active, Inactive, RoleAdmin, RoleCoordinator,
            RoleSstSpecialist, RoleNurse, RoleEmployee,
        ];

        for lang in [Language::SPANISH, Language::ENGLISH, Language::CHINESE] {
            for key in keys {
                assert!(
                    !resolve(lang, key).is_empty(),
                    "Empty string for {:?} in {}",
                    key,
                    lang.code()
                );
            }
        }
    }

    // ==================== Interpolation Tests ====================

    #[test]
    fn test_translate_substitutes_parameter() {
        let text = translate(
            Language::ENGLISH,
            TranslationKey::ConfirmDeleteMessage,
            &[("userName", "Ana")],
        );
        assert_eq!(text, "Are you sure you want to delete Ana?");
    }

    #[test]
    fn test_translate_substitutes_in_all_languages() {
        for lang in [Language::SPANISH, Language::ENGLISH, Language::CHINESE] {
            let text = translate(
                lang,
                TranslationKey::ConfirmDeleteMessage,
                &[("userName", "Bob")],
            );
            assert!(text.contains("Bob"), "Missing userName in {}", lang.code());
            assert!(!text.contains("{userName}"));
        }
    }

    #[test]
    fn test_translate_ignores_extra_params() {
        let text = translate(
            Language::ENGLISH,
            TranslationKey::DataRefreshed,
            &[("unused", "value")],
        );
        assert_eq!(text, "Data refreshed");
    }

    #[test]
    fn test_translate_leaves_unknown_placeholder() {
        let text = translate(Language::ENGLISH, TranslationKey::ConfirmDeleteMessage, &[]);
        assert!(text.contains("{userName}"));
    }

    // ==================== Role Label Tests ====================

    #[test]
    fn test_for_role_mapping() {
        assert_eq!(
            TranslationKey::for_role(Role::Admin),
            TranslationKey::RoleAdmin
        );
        assert_eq!(
            TranslationKey::for_role(Role::SstSpecialist),
            TranslationKey::RoleSstSpecialist
        );
        assert_eq!(
            TranslationKey::for_role(Role::Employee),
            TranslationKey::RoleEmployee
        );
    }

    #[test]
    fn test_role_labels_localized() {
        assert_eq!(
            resolve(Language::SPANISH, TranslationKey::RoleNurse),
            "Enfermero/a"
        );
        assert_eq!(resolve(Language::ENGLISH, TranslationKey::RoleNurse), "Nurse");
        assert_eq!(resolve(Language::CHINESE, TranslationKey::RoleNurse), "护士");
    }
}
